mod extension_test;
mod fees_per_liquidity_test;
mod ledger_test;
mod pool_key_test;
mod tick_test;
mod token_bank_test;
