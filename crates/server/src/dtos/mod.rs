pub mod pentashih;
pub mod response;
pub mod santri;
