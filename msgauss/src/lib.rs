// chemistry module
pub mod chemistry {
    pub mod constants;
}

// algorithm module
pub mod algorithm {
    pub mod averagine;
    pub mod cancel;
    pub mod reconstruction;
    pub mod rounding;
}

// data module
pub mod data {
    pub mod params;
    pub mod spectrum;
    pub mod stick;
}

pub mod error;
