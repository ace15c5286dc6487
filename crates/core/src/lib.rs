//! Fastarmor 공통 크레이트 — 타입, trait, 에러, 설정
//!
//! SSSD의 `krb5_fast_use_anonymous_pkinit` 동작을 원격 IPA 클라이언트에서
//! 검증하는 하네스의 공유 계층입니다. 원격 채널 trait([`host`]),
//! 실패 분류([`error`]), 하네스 설정([`config`])을 정의합니다.

pub mod config;
pub mod error;
pub mod host;
pub mod types;

// --- 주요 타입 re-export ---
// 각 모듈의 핵심 타입을 크레이트 루트에서 바로 사용할 수 있도록 합니다.

// 에러
pub use error::{AssertionError, ConfigError, FastarmorError, SetupError, TransportError};

// 설정
pub use config::FastarmorConfig;

// 원격 채널 trait
pub use host::{CommandChannel, LoginChannel};

// 도메인 타입
pub use types::{CommandOutput, HostInfo, Principal};
