use crate::errors::{ErrorCode, MathError};
use crate::token_bank::*;
use anchor_lang::prelude::*;

fn new_pubkey(val: u8) -> Pubkey {
    Pubkey::new_from_array([val; 32])
}

mod token_bank_tests {
    use super::*;

    #[test]
    fn test_mint_and_transfer() -> Result<()> {
        let (token, alice, bob) = (new_pubkey(1), new_pubkey(2), new_pubkey(3));
        let mut bank = TokenBank::new();

        bank.mint(token, alice, 1_000)?;
        bank.transfer(token, alice, bob, 400)?;

        assert_eq!(bank.balance_of(&token, &alice), 600);
        assert_eq!(bank.balance_of(&token, &bob), 400);
        assert_eq!(bank.balance_of(&new_pubkey(9), &alice), 0);
        Ok(())
    }

    #[test]
    fn test_transfer_insufficient_balance() {
        let (token, alice, bob) = (new_pubkey(1), new_pubkey(2), new_pubkey(3));
        let mut bank = TokenBank::new();
        bank.mint(token, alice, 10).unwrap();

        let result = bank.transfer(token, alice, bob, 11);
        assert_eq!(result.unwrap_err(), ErrorCode::InsufficientBalance.into());
        assert_eq!(bank.balance_of(&token, &alice), 10);
    }

    #[test]
    fn test_self_and_zero_transfers_are_no_ops() -> Result<()> {
        let (token, alice, bob) = (new_pubkey(1), new_pubkey(2), new_pubkey(3));
        let mut bank = TokenBank::new();

        bank.transfer(token, alice, bob, 0)?;
        bank.mint(token, alice, 5)?;
        bank.transfer(token, alice, alice, 5)?;
        assert_eq!(bank.balance_of(&token, &alice), 5);
        Ok(())
    }

    #[test]
    fn test_mint_overflow() {
        let (token, alice) = (new_pubkey(1), new_pubkey(2));
        let mut bank = TokenBank::new();
        bank.mint(token, alice, u128::MAX).unwrap();
        assert_eq!(bank.mint(token, alice, 1).unwrap_err(), MathError::Overflow.into());
    }
}
