//! Fastarmor SSSD 설정 헬퍼
//!
//! # Module Structure
//!
//! - [`conf`]: sssd.conf 모델 (`SssdConf`, 순서 보존 INI 파서)
//! - [`tools`]: 설정 헬퍼 (`SssdTools` — 섹션 해석, 옵션 변경, 캐시 초기화)
//! - [`fixture`]: 시나리오 픽스처 (`ConfBackup`, `ensure_principal`)

pub mod conf;
pub mod fixture;
pub mod tools;

#[cfg(test)]
pub(crate) mod testing;

// --- Public API Re-exports ---

pub use conf::{ConfSyntaxError, Section, SssdConf};
pub use fixture::{ConfBackup, ensure_principal};
pub use tools::SssdTools;
