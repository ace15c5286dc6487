//! sssd.conf 모델 — 섹션 순서를 보존하는 최소 INI 파서
//!
//! [`SssdConf`]는 원격 호스트에서 읽어 온 sssd.conf 본문을 파싱하여
//! 섹션/옵션을 조회·수정하고 다시 직렬화합니다. 주석과 빈 줄은
//! 직렬화 시 보존하지 않습니다 (옵션 변경 후 전체를 다시 씁니다).

use std::fmt;

/// sssd.conf 문법 에러
#[derive(Debug, thiserror::Error)]
#[error("line {line}: {reason}")]
pub struct ConfSyntaxError {
    /// 1부터 시작하는 줄 번호
    pub line: usize,
    /// 에러 사유
    pub reason: String,
}

/// 하나의 설정 섹션 (`[name]` 블록)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    /// 섹션 이름 (대괄호 제외)
    pub name: String,
    /// 순서가 보존되는 key = value 쌍
    pub entries: Vec<(String, String)>,
}

impl Section {
    fn new(name: &str) -> Self {
        Self {
            name: name.to_owned(),
            entries: Vec::new(),
        }
    }

    /// 옵션 값을 조회합니다.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// 옵션을 설정합니다 (기존 키는 덮어씀).
    pub fn set(&mut self, key: &str, value: &str) {
        if let Some(entry) = self.entries.iter_mut().find(|(k, _)| k == key) {
            entry.1 = value.to_owned();
        } else {
            self.entries.push((key.to_owned(), value.to_owned()));
        }
    }
}

/// 파싱된 sssd.conf
///
/// 섹션 등장 순서를 보존하므로 render 결과가 안정적입니다.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SssdConf {
    sections: Vec<Section>,
}

impl SssdConf {
    /// sssd.conf 본문을 파싱합니다.
    ///
    /// 허용 문법: `[section]` 헤더, `key = value` 항목, `#`/`;` 주석, 빈 줄.
    /// 섹션 밖의 key = value 항목과 `=` 없는 내용 줄은 문법 에러입니다.
    pub fn parse(content: &str) -> Result<Self, ConfSyntaxError> {
        let mut sections: Vec<Section> = Vec::new();

        for (idx, raw_line) in content.lines().enumerate() {
            let line = raw_line.trim();
            if line.is_empty() || line.starts_with('#') || line.starts_with(';') {
                continue;
            }

            if let Some(name) = line.strip_prefix('[') {
                let Some(name) = name.strip_suffix(']') else {
                    return Err(ConfSyntaxError {
                        line: idx + 1,
                        reason: format!("unterminated section header: '{raw_line}'"),
                    });
                };
                sections.push(Section::new(name.trim()));
                continue;
            }

            let Some((key, value)) = line.split_once('=') else {
                return Err(ConfSyntaxError {
                    line: idx + 1,
                    reason: format!("expected 'key = value', got: '{raw_line}'"),
                });
            };

            let Some(section) = sections.last_mut() else {
                return Err(ConfSyntaxError {
                    line: idx + 1,
                    reason: "option outside of any [section]".to_owned(),
                });
            };
            section.set(key.trim(), value.trim());
        }

        Ok(Self { sections })
    }

    /// 섹션을 조회합니다.
    pub fn section(&self, name: &str) -> Option<&Section> {
        self.sections.iter().find(|s| s.name == name)
    }

    /// 섹션의 옵션 값을 조회합니다.
    pub fn get(&self, section: &str, key: &str) -> Option<&str> {
        self.section(section).and_then(|s| s.get(key))
    }

    /// 섹션에 옵션을 설정합니다. 섹션이 없으면 끝에 새로 만듭니다.
    pub fn set_option(&mut self, section: &str, key: &str, value: &str) {
        if let Some(existing) = self.sections.iter_mut().find(|s| s.name == section) {
            existing.set(key, value);
        } else {
            let mut created = Section::new(section);
            created.set(key, value);
            self.sections.push(created);
        }
    }

    /// `[sssd]` 섹션의 `domains` 값 (쉼표 구분)을 반환합니다.
    pub fn domains(&self) -> Vec<String> {
        self.get("sssd", "domains")
            .map(|v| {
                v.split(',')
                    .map(|d| d.trim().to_owned())
                    .filter(|d| !d.is_empty())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// `domain/<name>` 형태의 섹션 이름들 (접두사 제외)을 반환합니다.
    pub fn domain_sections(&self) -> Vec<String> {
        self.sections
            .iter()
            .filter_map(|s| s.name.strip_prefix("domain/"))
            .map(str::to_owned)
            .collect()
    }

    /// 활성 도메인 섹션 이름을 반환합니다.
    ///
    /// `[sssd] domains =` 목록의 첫 항목을 우선하고, 없으면
    /// 첫 `[domain/...]` 섹션으로 대체합니다.
    pub fn first_domain(&self) -> Option<String> {
        self.domains()
            .into_iter()
            .next()
            .or_else(|| self.domain_sections().into_iter().next())
    }
}

impl fmt::Display for SssdConf {
    /// sssd.conf 형식으로 직렬화합니다. 항상 개행으로 끝납니다.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, section) in self.sections.iter().enumerate() {
            if idx > 0 {
                writeln!(f)?;
            }
            writeln!(f, "[{}]", section.name)?;
            for (key, value) in &section.entries {
                writeln!(f, "{key} = {value}")?;
            }
        }
        Ok(())
    }
}
