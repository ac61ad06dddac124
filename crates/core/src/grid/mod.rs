//! Raster containers and the validated landscape

pub mod fields;
pub mod landscape;

pub use fields::FieldData;
pub use landscape::{cells_to_area, Cell, Landscape, LandscapeLayers, NO_DATA, NO_DATA_FUEL};
