mod convert;

pub mod url {
    pub mod v1 {
        tonic::include_proto!("url.v1");
    }
}

pub mod v1 {
    pub use crate::convert::format_timestamp;
    pub use crate::url::v1::*;
}
