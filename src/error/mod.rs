mod flashdeck;

pub use flashdeck::{CoreError, CoreResult, ErrorDto, ErrorKind};
