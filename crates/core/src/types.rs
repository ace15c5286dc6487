//! 도메인 타입 — 시스템 전역에서 사용되는 공통 타입
//!
//! 원격 명령 결과, 테스트 계정, 대상 호스트 식별 정보 등
//! 모든 크레이트가 공유하는 데이터 구조를 정의합니다.

use std::fmt;

use serde::{Deserialize, Serialize};

/// 원격 명령 실행 결과
///
/// 하나의 원격 명령이 종료된 뒤의 종료 코드와 캡처된 출력을 담습니다.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommandOutput {
    /// 종료 코드
    pub returncode: i32,
    /// 표준 출력 (UTF-8 lossy 변환)
    pub stdout: String,
    /// 표준 에러
    pub stderr: String,
}

impl CommandOutput {
    /// 종료 코드가 0이면 true
    pub fn success(&self) -> bool {
        self.returncode == 0
    }
}

impl fmt::Display for CommandOutput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "exit={} stdout={}B", self.returncode, self.stdout.len())
    }
}

/// 테스트 계정 (사전 프로비저닝된 IPA 사용자)
///
/// 대화형 로그인 단계에서 사용됩니다. 계정 생성은 외부 오케스트레이션
/// 계층의 책임이며, 하네스는 존재 여부만 확인합니다.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Principal {
    /// 사용자명
    pub username: String,
    /// 비밀번호
    pub password: String,
}

impl fmt::Display for Principal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // 비밀번호는 절대 출력하지 않음
        write!(f, "{}", self.username)
    }
}

/// 대상 호스트 식별 정보
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HostInfo {
    /// SSH 접속 주소 (IP 또는 FQDN)
    pub address: String,
    /// 시스템 호스트명 (기대 마커의 `{hostname}` 자리에 들어감)
    pub hostname: String,
    /// SSH 포트
    pub ssh_port: u16,
}

impl HostInfo {
    /// `address:port` 형식의 접속 문자열을 반환합니다.
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.address, self.ssh_port)
    }
}

impl fmt::Display for HostInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.hostname, self.socket_addr())
    }
}
