pub mod clock;
pub mod pool;
pub mod tariff;
pub mod transport;
pub mod worker;
