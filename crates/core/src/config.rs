//! 설정 관리 — fastarmor.toml 파싱 및 런타임 설정
//!
//! [`FastarmorConfig`]는 하네스 전체의 설정을 담는 최상위 구조체입니다.
//!
//! # 설정 로딩 우선순위
//! 1. CLI 인자 (최고 우선)
//! 2. 환경변수 (`FASTARMOR_TARGET_ADDRESS=client1.example.test` 형식)
//! 3. 설정 파일 (`fastarmor.toml`)
//! 4. 기본값 (`Default` 구현)
//!
//! # 사용 예시
//! ```no_run
//! # async fn example() -> Result<(), fastarmor_core::error::FastarmorError> {
//! use fastarmor_core::config::FastarmorConfig;
//!
//! // 파일에서 로드 + 환경변수 오버라이드
//! let config = FastarmorConfig::load("fastarmor.toml").await?;
//!
//! // TOML 문자열에서 직접 파싱
//! let config = FastarmorConfig::parse("[target]\naddress = \"192.0.2.10\"")?;
//! # Ok(())
//! # }
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{ConfigError, FastarmorError};
use crate::types::{HostInfo, Principal};

/// Fastarmor 통합 설정
///
/// `fastarmor.toml` 파일의 최상위 구조를 나타냅니다.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FastarmorConfig {
    /// 일반 설정
    #[serde(default)]
    pub general: GeneralConfig,
    /// 대상 호스트 설정
    #[serde(default)]
    pub target: TargetConfig,
    /// 테스트 계정 설정
    #[serde(default)]
    pub principal: PrincipalConfig,
    /// SSSD 관련 경로/서비스 설정
    #[serde(default)]
    pub sssd: SssdConfig,
    /// 실행 설정
    #[serde(default)]
    pub run: RunConfig,
}

impl FastarmorConfig {
    /// TOML 파일에서 설정을 로드하고 환경변수 오버라이드를 적용합니다.
    ///
    /// 설정 로딩 순서:
    /// 1. TOML 파일 파싱
    /// 2. 환경변수 오버라이드 적용
    pub async fn load(path: impl AsRef<Path>) -> Result<Self, FastarmorError> {
        let (config, issues) = Self::load_with_report(path).await?;
        for issue in &issues {
            warn!(
                env_key = %issue.env_key,
                value = %issue.value,
                expected = issue.expected,
                "ignoring malformed environment override"
            );
        }
        Ok(config)
    }

    /// [`load`](Self::load)와 동일하되, 무시된 환경변수 오버라이드를 로그 대신
    /// 반환합니다. tracing 구독자가 아직 초기화되지 않은 시점에 호출하는
    /// 경우(예: CLI 부팅) 경고가 유실되지 않도록 지연 보고할 수 있습니다.
    pub async fn load_with_report(
        path: impl AsRef<Path>,
    ) -> Result<(Self, Vec<EnvOverrideIssue>), FastarmorError> {
        // 검증은 환경변수 오버라이드까지 적용된 뒤 한 번만 수행합니다.
        let mut config = Self::parse(&read_config_file(path.as_ref()).await?)?;
        let issues = config.apply_env_overrides();
        config.validate()?;
        Ok((config, issues))
    }

    /// TOML 파일에서 설정을 로드합니다 (환경변수 오버라이드 없음).
    pub async fn from_file(path: impl AsRef<Path>) -> Result<Self, FastarmorError> {
        let config = Self::parse(&read_config_file(path.as_ref()).await?)?;
        config.validate()?;
        Ok(config)
    }

    /// TOML 문자열에서 설정을 파싱합니다.
    pub fn parse(toml_str: &str) -> Result<Self, FastarmorError> {
        toml::from_str(toml_str).map_err(|e| {
            FastarmorError::Config(ConfigError::ParseFailed {
                reason: e.to_string(),
            })
        })
    }

    /// 환경변수로 설정값을 오버라이드합니다.
    ///
    /// 환경변수 네이밍 규칙: `FASTARMOR_{SECTION}_{FIELD}`
    /// 예: `FASTARMOR_TARGET_ADDRESS=192.0.2.10`
    ///
    /// 파싱할 수 없는 숫자 값은 무시하고 [`EnvOverrideIssue`]로 반환합니다.
    pub fn apply_env_overrides(&mut self) -> Vec<EnvOverrideIssue> {
        let mut issues = Vec::new();

        // General
        override_string(&mut self.general.log_level, "FASTARMOR_GENERAL_LOG_LEVEL");
        override_string(&mut self.general.log_format, "FASTARMOR_GENERAL_LOG_FORMAT");

        // Target
        override_string(&mut self.target.address, "FASTARMOR_TARGET_ADDRESS");
        override_string(&mut self.target.hostname, "FASTARMOR_TARGET_HOSTNAME");
        issues.extend(override_u16(
            &mut self.target.ssh_port,
            "FASTARMOR_TARGET_SSH_PORT",
        ));
        override_string(&mut self.target.ssh_user, "FASTARMOR_TARGET_SSH_USER");
        override_string(&mut self.target.ssh_password, "FASTARMOR_TARGET_SSH_PASSWORD");

        // Principal
        override_string(&mut self.principal.username, "FASTARMOR_PRINCIPAL_USERNAME");
        override_string(&mut self.principal.password, "FASTARMOR_PRINCIPAL_PASSWORD");

        // SSSD
        override_string(&mut self.sssd.conf_path, "FASTARMOR_SSSD_CONF_PATH");
        override_string(&mut self.sssd.db_dir, "FASTARMOR_SSSD_DB_DIR");
        override_csv(&mut self.sssd.cache_dirs, "FASTARMOR_SSSD_CACHE_DIRS");
        override_string(&mut self.sssd.service, "FASTARMOR_SSSD_SERVICE");
        issues.extend(override_u64(
            &mut self.sssd.service_start_timeout_secs,
            "FASTARMOR_SSSD_SERVICE_START_TIMEOUT_SECS",
        ));

        // Run
        override_csv(&mut self.run.scenarios, "FASTARMOR_RUN_SCENARIOS");
        issues.extend(override_u64(
            &mut self.run.command_timeout_secs,
            "FASTARMOR_RUN_COMMAND_TIMEOUT_SECS",
        ));

        issues
    }

    /// 설정값의 유효성을 검증합니다.
    pub fn validate(&self) -> Result<(), FastarmorError> {
        // log_level 검증
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.general.log_level.as_str()) {
            return Err(ConfigError::InvalidValue {
                field: "general.log_level".to_owned(),
                reason: format!("must be one of: {}", valid_levels.join(", ")),
            }
            .into());
        }

        // log_format 검증은 파싱과 동일한 경로를 사용합니다.
        self.general.parse_log_format()?;

        if self.target.address.is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "target.address".to_owned(),
                reason: "target address must not be empty".to_owned(),
            }
            .into());
        }

        if self.target.hostname.is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "target.hostname".to_owned(),
                reason: "target hostname must not be empty".to_owned(),
            }
            .into());
        }

        if self.target.ssh_port == 0 {
            return Err(ConfigError::InvalidValue {
                field: "target.ssh_port".to_owned(),
                reason: "ssh port must be 1-65535".to_owned(),
            }
            .into());
        }

        if self.principal.username.is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "principal.username".to_owned(),
                reason: "test principal username must not be empty".to_owned(),
            }
            .into());
        }

        if self.sssd.conf_path.is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "sssd.conf_path".to_owned(),
                reason: "sssd.conf path must not be empty".to_owned(),
            }
            .into());
        }

        if self.sssd.service_start_timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "sssd.service_start_timeout_secs".to_owned(),
                reason: "service start timeout must be at least 1 second".to_owned(),
            }
            .into());
        }

        if self.run.command_timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "run.command_timeout_secs".to_owned(),
                reason: "command timeout must be at least 1 second".to_owned(),
            }
            .into());
        }

        Ok(())
    }

    /// 대상 호스트 식별 정보를 반환합니다.
    pub fn host_info(&self) -> HostInfo {
        HostInfo {
            address: self.target.address.clone(),
            hostname: self.target.hostname.clone(),
            ssh_port: self.target.ssh_port,
        }
    }

    /// 테스트 계정을 반환합니다.
    pub fn test_principal(&self) -> Principal {
        Principal {
            username: self.principal.username.clone(),
            password: self.principal.password.clone(),
        }
    }
}

/// 일반 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// 로그 레벨 (trace, debug, info, warn, error)
    pub log_level: String,
    /// 로그 형식 (json, pretty)
    pub log_format: String,
}

impl GeneralConfig {
    /// `log_format` 문자열을 [`LogFormat`]으로 해석합니다.
    ///
    /// [`FastarmorConfig::validate`]가 동일한 경로를 거치므로, 검증을 통과한
    /// 설정에서는 실패하지 않습니다.
    pub fn parse_log_format(&self) -> Result<LogFormat, ConfigError> {
        match self.log_format.as_str() {
            "json" => Ok(LogFormat::Json),
            "pretty" => Ok(LogFormat::Pretty),
            other => Err(ConfigError::InvalidValue {
                field: "general.log_format".to_owned(),
                reason: format!("unknown log format '{other}', must be one of: json, pretty"),
            }),
        }
    }
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_owned(),
            log_format: "json".to_owned(),
        }
    }
}

/// 로그 출력 형식
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// 구조화된 JSON 로그 (수집기 연동용)
    Json,
    /// 사람이 읽기 좋은 개발용 출력
    Pretty,
}

/// 대상 호스트 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TargetConfig {
    /// SSH 접속 주소 (IP 또는 FQDN)
    pub address: String,
    /// 시스템 호스트명 (기대 마커 확장에 사용)
    pub hostname: String,
    /// SSH 포트
    pub ssh_port: u16,
    /// 관리용 SSH 계정
    pub ssh_user: String,
    /// 관리용 SSH 비밀번호
    pub ssh_password: String,
}

impl Default for TargetConfig {
    fn default() -> Self {
        Self {
            address: String::new(),
            hostname: String::new(),
            ssh_port: 22,
            ssh_user: "root".to_owned(),
            ssh_password: String::new(),
        }
    }
}

/// 테스트 계정 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PrincipalConfig {
    /// 사전 프로비저닝된 IPA 사용자명
    pub username: String,
    /// 해당 사용자의 비밀번호
    pub password: String,
}

impl Default for PrincipalConfig {
    fn default() -> Self {
        Self {
            username: "foobar0".to_owned(),
            password: "Secret123".to_owned(),
        }
    }
}

/// SSSD 관련 경로/서비스 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SssdConfig {
    /// 원격 sssd.conf 경로
    pub conf_path: String,
    /// ccache 아티팩트가 생성되는 디렉토리
    pub db_dir: String,
    /// 캐시 초기화 시 비우는 디렉토리 목록
    pub cache_dirs: Vec<String>,
    /// systemd 서비스명
    pub service: String,
    /// 캐시 초기화 후 서비스 기동 대기 시간 (초)
    pub service_start_timeout_secs: u64,
}

impl Default for SssdConfig {
    fn default() -> Self {
        Self {
            conf_path: "/etc/sssd/sssd.conf".to_owned(),
            db_dir: "/var/lib/sss/db".to_owned(),
            cache_dirs: vec!["/var/lib/sss/db".to_owned(), "/var/lib/sss/mc".to_owned()],
            service: "sssd".to_owned(),
            service_start_timeout_secs: 60,
        }
    }
}

/// 실행 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    /// 실행할 시나리오 이름 목록 (비어 있으면 전체 실행)
    pub scenarios: Vec<String>,
    /// 원격 명령 제한 시간 (초)
    pub command_timeout_secs: u64,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            scenarios: Vec::new(),
            command_timeout_secs: 300,
        }
    }
}

async fn read_config_file(path: &Path) -> Result<String, FastarmorError> {
    tokio::fs::read_to_string(path).await.map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            FastarmorError::Config(ConfigError::FileNotFound {
                path: path.display().to_string(),
            })
        } else {
            FastarmorError::Io(e)
        }
    })
}

/// 무시된 환경변수 오버라이드
///
/// 숫자 필드에 파싱 불가능한 값이 들어온 경우입니다. 설정 로딩 자체는
/// 계속되고, 호출자가 적절한 시점에 경고로 보고합니다.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvOverrideIssue {
    /// 환경변수 이름
    pub env_key: String,
    /// 파싱에 실패한 원본 값
    pub value: String,
    /// 기대한 타입
    pub expected: &'static str,
}

// --- 환경변수 오버라이드 헬퍼 ---

fn override_string(target: &mut String, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        *target = val;
    }
}

fn override_u16(target: &mut u16, env_key: &str) -> Option<EnvOverrideIssue> {
    let val = std::env::var(env_key).ok()?;
    match val.parse::<u16>() {
        Ok(parsed) => {
            *target = parsed;
            None
        }
        Err(_) => Some(EnvOverrideIssue {
            env_key: env_key.to_owned(),
            value: val,
            expected: "u16",
        }),
    }
}

fn override_u64(target: &mut u64, env_key: &str) -> Option<EnvOverrideIssue> {
    let val = std::env::var(env_key).ok()?;
    match val.parse::<u64>() {
        Ok(parsed) => {
            *target = parsed;
            None
        }
        Err(_) => Some(EnvOverrideIssue {
            env_key: env_key.to_owned(),
            value: val,
            expected: "u64",
        }),
    }
}

fn override_csv(target: &mut Vec<String>, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        *target = val.split(',').map(|s| s.trim().to_owned()).collect();
    }
}
