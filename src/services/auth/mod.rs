/*
 * Responsibility
 * - 認証まわりの service (トークン検証 / アクセスポリシー) の公開ポイント
 */
pub mod policy;
pub mod token;

pub use policy::Policy;
pub use token::TokenVerifier;
