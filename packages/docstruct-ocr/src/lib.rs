pub mod decode;
pub mod engine;
pub mod tesseract;

#[cfg(feature = "leptess")]
pub mod libtess;

pub use decode::{decode_image, encode_png};
pub use engine::{OcrEngine, OcrError, OcrInput, OcrOutput};
pub use tesseract::TesseractOcrEngine;

#[cfg(feature = "leptess")]
pub use libtess::LeptessOcrEngine;
