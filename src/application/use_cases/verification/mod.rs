pub mod redeem_code;
