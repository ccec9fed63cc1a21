pub mod health;
pub mod void;
