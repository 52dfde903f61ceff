pub mod xkcd;

pub use xkcd::ComicInfo;
