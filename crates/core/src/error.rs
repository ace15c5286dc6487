//! 에러 타입 — 실패 분류 체계 정의
//!
//! 시나리오 실패는 세 종류로 구분됩니다:
//! 설정/환경 실패([`SetupError`]), 전송 계층 실패([`TransportError`]),
//! 기능 회귀 실패([`AssertionError`]). CLI는 이 분류를 종료 코드에 매핑합니다.

/// Fastarmor 최상위 에러 타입
#[derive(Debug, thiserror::Error)]
pub enum FastarmorError {
    /// 설정 관련 에러
    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    /// 환경/사전조건 실패
    #[error("setup error: {0}")]
    Setup(#[from] SetupError),

    /// SSH 전송 계층 실패
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// 기능 회귀 (아티팩트 검증 실패)
    #[error("assertion error: {0}")]
    Assertion(#[from] AssertionError),

    /// I/O 에러
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// 설정 관련 에러
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// 설정 파일을 찾을 수 없음
    #[error("config file not found: {path}")]
    FileNotFound { path: String },

    /// 설정 파싱 실패
    #[error("failed to parse config: {reason}")]
    ParseFailed { reason: String },

    /// 유효하지 않은 설정 값
    #[error("invalid config value for '{field}': {reason}")]
    InvalidValue { field: String, reason: String },
}

/// 환경/사전조건 실패
///
/// 성공이 필수인 원격 명령이 0이 아닌 종료 코드를 반환했거나,
/// 시나리오 실행에 필요한 사전조건이 충족되지 않은 경우입니다.
/// 기능 회귀가 아니라 테스트 환경의 문제를 의미합니다.
#[derive(Debug, thiserror::Error)]
pub enum SetupError {
    /// 필수 원격 명령 실패
    #[error("remote command '{step}' failed with exit code {returncode}: {stderr}")]
    CommandFailed {
        step: String,
        returncode: i32,
        stderr: String,
    },

    /// 테스트 계정이 호스트에 존재하지 않음
    #[error("test principal '{username}' not found on target host")]
    MissingPrincipal { username: String },

    /// sssd.conf에 도메인 섹션이 없음
    #[error("no domain section configured in {conf_path}")]
    SectionNotFound { conf_path: String },

    /// sssd 서비스가 제한 시간 내에 기동하지 못함
    #[error("service '{service}' did not become active within {timeout_secs}s")]
    ServiceNotActive { service: String, timeout_secs: u64 },

    /// sssd.conf 파싱 실패
    #[error("failed to parse {conf_path}: {reason}")]
    ConfParseFailed { conf_path: String, reason: String },
}

/// SSH 전송 계층 실패
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// TCP 연결 실패
    #[error("connection to {address} failed: {reason}")]
    Connect { address: String, reason: String },

    /// 인증 실패
    #[error("authentication as '{username}' failed: {reason}")]
    Auth { username: String, reason: String },

    /// 원격 명령 실행 채널 실패
    #[error("exec channel failed: {0}")]
    Exec(String),

    /// 세션이 이미 종료됨
    #[error("session closed: {0}")]
    ChannelClosed(String),
}

/// 기능 회귀 (아티팩트 검증 실패)
///
/// 시나리오의 모든 사전 단계가 성공했으나 생성된 ccache 아티팩트가
/// 기대 마커와 일치하지 않는 경우입니다.
#[derive(Debug, thiserror::Error)]
pub enum AssertionError {
    /// 기대 마커가 출력에 없음
    #[error("scenario '{scenario}': expected marker '{expected}' not found in output:\n{output}")]
    MarkerMismatch {
        scenario: String,
        expected: String,
        output: String,
    },

    /// ccache 아티팩트가 생성되지 않음
    #[error("ccache artifact '{path}' missing or unreadable: {stderr}")]
    ArtifactMissing { path: String, stderr: String },

    /// 기대 마커의 정규식이 유효하지 않음
    #[error("invalid expected-marker pattern '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn setup_error_display_includes_step_and_code() {
        let err = SetupError::CommandFailed {
            step: "kinit -n".to_owned(),
            returncode: 1,
            stderr: "no such realm".to_owned(),
        };
        let msg = err.to_string();
        assert!(msg.contains("kinit -n"));
        assert!(msg.contains("exit code 1"));
        assert!(msg.contains("no such realm"));
    }

    #[test]
    fn assertion_error_display_includes_expected_marker() {
        let err = AssertionError::MarkerMismatch {
            scenario: "anonymous-pkinit-enabled".to_owned(),
            expected: "WELLKNOWN/ANONYMOUS@WELLKNOWN:ANONYMOUS".to_owned(),
            output: "Ticket cache: FILE:...".to_owned(),
        };
        let msg = err.to_string();
        assert!(msg.contains("anonymous-pkinit-enabled"));
        assert!(msg.contains("WELLKNOWN/ANONYMOUS@WELLKNOWN:ANONYMOUS"));
    }

    #[test]
    fn error_variants_convert_into_top_level() {
        let setup: FastarmorError = SetupError::MissingPrincipal {
            username: "foobar0".to_owned(),
        }
        .into();
        assert!(matches!(setup, FastarmorError::Setup(_)));

        let transport: FastarmorError = TransportError::Exec("broken pipe".to_owned()).into();
        assert!(matches!(transport, FastarmorError::Transport(_)));

        let assertion: FastarmorError = AssertionError::ArtifactMissing {
            path: "/var/lib/sss/db/fast_ccache_EXAMPLE".to_owned(),
            stderr: "No such file or directory".to_owned(),
        }
        .into();
        assert!(matches!(assertion, FastarmorError::Assertion(_)));
    }
}
