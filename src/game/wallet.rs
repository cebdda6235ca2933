//! 金幣錢包與被動收入

use crate::error::GameError;

/// 金幣餘額（永不為負）
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Wallet {
    balance: i64,
}

impl Wallet {
    pub fn new(balance: i64) -> Self {
        Self {
            balance: balance.max(0),
        }
    }

    pub fn balance(&self) -> i64 {
        self.balance
    }

    pub fn can_afford(&self, amount: i64) -> bool {
        amount <= self.balance
    }

    /// 扣款；餘額不足時不變動
    pub fn spend(&mut self, amount: i64) -> Result<(), GameError> {
        if !self.can_afford(amount) {
            return Err(GameError::InsufficientCoins {
                needed: amount,
                available: self.balance,
            });
        }
        self.balance -= amount;
        Ok(())
    }

    pub fn credit(&mut self, amount: i64) {
        self.balance = self.balance.saturating_add(amount.max(0));
    }
}

/// 被動收入倒數計時（每秒 tick 一次）
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PassiveIncome {
    pub amount: i64,
    pub interval_secs: u32,
    seconds_left: u32,
}

impl PassiveIncome {
    pub fn new(amount: i64, interval_secs: u32) -> Self {
        let interval_secs = interval_secs.max(1);
        Self {
            amount,
            interval_secs,
            seconds_left: interval_secs,
        }
    }

    pub fn seconds_left(&self) -> u32 {
        self.seconds_left
    }

    /// 經過一秒；到期時回傳應入帳金額並重設倒數
    pub fn tick(&mut self) -> Option<i64> {
        if self.seconds_left <= 1 {
            self.seconds_left = self.interval_secs;
            return Some(self.amount);
        }
        self.seconds_left -= 1;
        None
    }
}

// ============================================================================
// 單元測試
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spend_and_credit() {
        let mut wallet = Wallet::new(100);
        assert!(wallet.spend(60).is_ok());
        assert_eq!(wallet.balance(), 40);

        let err = wallet.spend(50).unwrap_err();
        assert!(matches!(err, GameError::InsufficientCoins { needed: 50, available: 40 }));
        assert_eq!(wallet.balance(), 40);

        wallet.credit(10);
        assert_eq!(wallet.balance(), 50);
    }

    #[test]
    fn test_negative_start_clamped() {
        assert_eq!(Wallet::new(-5).balance(), 0);
    }

    #[test]
    fn test_passive_income_cycle() {
        let mut income = PassiveIncome::new(10, 3);
        assert_eq!(income.tick(), None);
        assert_eq!(income.seconds_left(), 2);
        assert_eq!(income.tick(), None);
        assert_eq!(income.tick(), Some(10));
        assert_eq!(income.seconds_left(), 3);
    }
}
