// Purpose: To store physical constants used when generating stick spectra
pub const MASS_PROTON: f64 = 1.007276466621; // Unified atomic mass unit
pub const MASS_NEUTRON: f64 = 1.00866491595; // Unified atomic mass unit
