//! 預定義卡牌目錄
//!
//! 具名卡牌（有固定背景故事與數值）。每張設計在相簿中佔有專屬槽位，
//! 抽到完全相同數值組合的卡片時一律歸入該槽位。

use super::cards::{AnimalType, CardDesign, CardInstance, Rarity, Role};

pub const LOKITO_KEY: &str = "lokito";
pub const ROMEO_KEY: &str = "romeo";
pub const BUCK_KEY: &str = "buck";

/// 預定義卡牌設計表
pub const PREDEFINED_DESIGNS: &[CardDesign] = &[
    // 傳奇貓咪（簽名卡）
    CardDesign {
        design_key: LOKITO_KEY,
        name: "Lokito",
        description: "Il carismatico condottiero dal manto bianco e nero. Comanda con uno \
                      sguardo un incredibile esercito di squali, cani e insetti.",
        rarity: Rarity::Legendary,
        animal_type: AnimalType::Felino,
        role: Role::Attaccante,
        attack: 110,
        defense: 50,
        hp: 90,
        image_prompt: Some(
            "Epic portrait of a powerful black and white cat with glowing emerald green eyes. \
             It is surrounded by blurred silhouettes of sharks, dogs, and birds, looking like a \
             mythical leader. Fantasy TCG art style. NO TEXT.",
        ),
    },
    CardDesign {
        design_key: ROMEO_KEY,
        name: "Romeo",
        description: "Un gatto grigio e bianco dalla mole imponente. Dove si siede lui, \
                      nessuno osa passare.",
        rarity: Rarity::Legendary,
        animal_type: AnimalType::Felino,
        role: Role::Difensore,
        attack: 70,
        defense: 120,
        hp: 130,
        image_prompt: Some(
            "A very fat and majestic grey and white cat sitting proudly, an epic gathering of \
             sharks, dogs, mosquitoes and birds behind him. Cinematic high-fantasy style. NO TEXT.",
        ),
    },
    CardDesign {
        design_key: BUCK_KEY,
        name: "Buck",
        description: "Il saggio gatto arancione con un occhio solo. Ha visto abbastanza da \
                      prevedere ogni mossa del nemico.",
        rarity: Rarity::Legendary,
        animal_type: AnimalType::Felino,
        role: Role::Supporto,
        attack: 85,
        defense: 80,
        hp: 95,
        image_prompt: Some(
            "A wise orange cat with one scarred eye leading a massive army of sharks, dogs, giant \
             mosquitoes and birds. Epic fantasy digital illustration. NO TEXT.",
        ),
    },
    // 其他具名卡
    CardDesign {
        design_key: "zanna-bianca",
        name: "Zanna Bianca",
        description: "Lupo solitario delle nevi, fedele solo al branco che ha scelto.",
        rarity: Rarity::SuperRare,
        animal_type: AnimalType::Cane,
        role: Role::Attaccante,
        attack: 75,
        defense: 45,
        hp: 70,
        image_prompt: None,
    },
    CardDesign {
        design_key: "briciola",
        name: "Briciola",
        description: "Bassotto curioso che scava ovunque in cerca di tesori.",
        rarity: Rarity::Common,
        animal_type: AnimalType::Cane,
        role: Role::Esploratore,
        attack: 12,
        defense: 10,
        hp: 18,
        image_prompt: None,
    },
    CardDesign {
        design_key: "ammiraglio-pinna",
        name: "Ammiraglio Pinna",
        description: "Lo squalo martello che guida la flotta degli abissi.",
        rarity: Rarity::SuperRare,
        animal_type: AnimalType::Pesce,
        role: Role::Attaccante,
        attack: 80,
        defense: 40,
        hp: 65,
        image_prompt: None,
    },
    CardDesign {
        design_key: "bolla",
        name: "Bolla",
        description: "Pesce palla timido che si gonfia al minimo rumore.",
        rarity: Rarity::Common,
        animal_type: AnimalType::Pesce,
        role: Role::Difensore,
        attack: 6,
        defense: 20,
        hp: 16,
        image_prompt: None,
    },
    CardDesign {
        design_key: "zanzara-regina",
        name: "Zanzara Regina",
        description: "Sovrana dello sciame notturno; il suo ronzio annuncia la battaglia.",
        rarity: Rarity::Rare,
        animal_type: AnimalType::Insetto,
        role: Role::Ingannatore,
        attack: 45,
        defense: 15,
        hp: 30,
        image_prompt: None,
    },
    CardDesign {
        design_key: "formica-operaia",
        name: "Formica Operaia",
        description: "Instancabile e organizzata, porta dieci volte il proprio peso.",
        rarity: Rarity::Common,
        animal_type: AnimalType::Insetto,
        role: Role::Supporto,
        attack: 8,
        defense: 14,
        hp: 12,
        image_prompt: None,
    },
    CardDesign {
        design_key: "corvo-oracolo",
        name: "Corvo Oracolo",
        description: "Legge il futuro nelle nuvole e lo racconta solo a chi ascolta.",
        rarity: Rarity::Rare,
        animal_type: AnimalType::Volatile,
        role: Role::Supporto,
        attack: 35,
        defense: 30,
        hp: 40,
        image_prompt: None,
    },
    CardDesign {
        design_key: "falco-tempesta",
        name: "Falco Tempesta",
        description: "Si lancia in picchiata dal cuore dei temporali.",
        rarity: Rarity::Uncommon,
        animal_type: AnimalType::Volatile,
        role: Role::Esploratore,
        attack: 30,
        defense: 15,
        hp: 25,
        image_prompt: None,
    },
    CardDesign {
        design_key: "topo-bibliotecario",
        name: "Topo Bibliotecario",
        description: "Ha rosicchiato ogni libro della biblioteca e ricorda ogni parola.",
        rarity: Rarity::Uncommon,
        animal_type: AnimalType::Roditore,
        role: Role::Supporto,
        attack: 14,
        defense: 22,
        hp: 26,
        image_prompt: None,
    },
    CardDesign {
        design_key: "re-dei-ratti",
        name: "Re dei Ratti",
        description: "Regna sulle fogne della città con una corona di tappi di bottiglia.",
        rarity: Rarity::SuperRare,
        animal_type: AnimalType::Roditore,
        role: Role::Ingannatore,
        attack: 60,
        defense: 55,
        hp: 70,
        image_prompt: None,
    },
    CardDesign {
        design_key: "geco-ombra",
        name: "Geco Ombra",
        description: "Si mimetizza con qualsiasi muro e colpisce quando meno te lo aspetti.",
        rarity: Rarity::Uncommon,
        animal_type: AnimalType::Rettile,
        role: Role::Ingannatore,
        attack: 26,
        defense: 12,
        hp: 20,
        image_prompt: None,
    },
    CardDesign {
        design_key: "tartaruga-antica",
        name: "Tartaruga Antica",
        description: "Porta sul guscio le mappe di terre scomparse.",
        rarity: Rarity::Rare,
        animal_type: AnimalType::Rettile,
        role: Role::Difensore,
        attack: 20,
        defense: 70,
        hp: 60,
        image_prompt: None,
    },
    CardDesign {
        design_key: "micio-del-vicolo",
        name: "Micio del Vicolo",
        description: "Randagio di quartiere, conosce ogni scorciatoia e ogni cuoco generoso.",
        rarity: Rarity::Common,
        animal_type: AnimalType::Felino,
        role: Role::Esploratore,
        attack: 14,
        defense: 8,
        hp: 15,
        image_prompt: None,
    },
];

/// 依 design key 查詢
pub fn find_design(design_key: &str) -> Option<&'static CardDesign> {
    PREDEFINED_DESIGNS.iter().find(|d| d.design_key == design_key)
}

/// 完全比對（名稱、類型、稀有度、定位、攻防血）
pub fn find_exact(card: &CardInstance) -> Option<&'static CardDesign> {
    PREDEFINED_DESIGNS.iter().find(|d| card.matches_design(d))
}

/// 指定稀有度的預定義設計
pub fn designs_by_rarity(rarity: Rarity) -> Vec<&'static CardDesign> {
    PREDEFINED_DESIGNS.iter().filter(|d| d.rarity == rarity).collect()
}

/// 指定 (類型, 稀有度) 已使用的預定義數量
pub fn predefined_count(designs: &[CardDesign], animal_type: AnimalType, rarity: Rarity) -> u32 {
    designs
        .iter()
        .filter(|d| d.animal_type == animal_type && d.rarity == rarity)
        .count() as u32
}

// ============================================================================
// 單元測試
// ============================================================================
