/*!
 * Authenticated identity extractor
 *
 * Responsibility:
 * - Guard が検証した Identity を handler に提供する
 * - request extensions への格納キーは crate 外から触れない型にする
 *
 * Public API:
 * - Identity
 * - CurrentIdentity
 * - extract_identity
 */

mod core;
mod types;

pub use self::core::{CurrentIdentity, extract_identity};
pub use types::Identity;

pub(crate) use self::core::attach;
