pub mod noise;
pub mod peripheral;
pub mod quantize;
pub mod registers;
