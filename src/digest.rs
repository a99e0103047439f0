//! Content digest used to compare strategy output against `BENCH_MD5`

use md5::{Digest, Md5};

/// Lowercase hex MD5 of `content`
pub fn digest(content: &[u8]) -> String {
    hex::encode(Md5::digest(content))
}
