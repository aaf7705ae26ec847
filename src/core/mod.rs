// Domain-layer modules and shared errors/models
pub mod enrichment {
    pub use crate::enrichment::*;
}

pub mod models {
    pub use crate::models::*;
}

pub mod submission {
    pub use crate::submission::*;
}

pub mod errors {
    pub use crate::errors::*;
}
