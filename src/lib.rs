pub mod matrix {
    pub mod dense;
    pub mod element;
}
pub mod rings {
    pub mod rational;
}
