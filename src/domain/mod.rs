pub mod void;
