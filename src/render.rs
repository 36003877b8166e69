pub mod blur;
pub mod cover;
pub mod fanout;
pub mod gradient;
pub mod painter;
pub mod surface;
pub mod text;
