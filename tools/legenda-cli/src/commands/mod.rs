pub mod align;
pub mod check;
pub mod inspect;
