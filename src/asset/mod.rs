pub mod font;
pub mod loctext;
