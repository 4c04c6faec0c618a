use serde::{Deserialize, Serialize};

/// OpenGL version used both for context creation and for the `#version`
/// line prepended to every shader.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GlVersion {
    pub major: u8,
    pub minor: u8,
}

impl GlVersion {
    pub const fn new(major: u8, minor: u8) -> Self {
        Self { major, minor }
    }

    /// `#version 410 core` for 4.1
    pub fn directive(self) -> String {
        format!("#version {}{}0 core\n", self.major, self.minor)
    }
}

impl Default for GlVersion {
    fn default() -> Self {
        Self::new(4, 1)
    }
}

/// Builds one compilation unit: version line, every utility snippet followed
/// by a newline, then the entry shader text.
pub fn assemble_source(version: GlVersion, utils: &[String], entry: &str) -> String {
    let mut source = version.directive();
    for util in utils {
        source.push_str(util);
        source.push('\n');
    }
    source.push_str(entry);
    source
}

/// Names of the subroutine implementations declared in `source`, in order.
///
/// Matches `subroutine(<type>) <return> <Name>(`; plain `subroutine <ret>
/// <type>(...)` type declarations and `subroutine uniform` lines are skipped.
pub fn subroutine_names(source: &str) -> Vec<String> {
    let mut names = Vec::new();
    let mut rest = source;

    while let Some(pos) = rest.find("subroutine") {
        rest = &rest[pos + "subroutine".len()..];
        let after = rest.trim_start();
        let Some(after_paren) = after.strip_prefix('(') else {
            continue;
        };
        let Some(close) = after_paren.find(')') else {
            break;
        };
        let mut tokens = after_paren[close + 1..].split_whitespace();
        // return type, then "Name(" possibly glued to the parenthesis
        let (Some(_ret), Some(name_token)) = (tokens.next(), tokens.next()) else {
            continue;
        };
        let name: String = name_token
            .chars()
            .take_while(|c| c.is_alphanumeric() || *c == '_')
            .collect();
        if !name.is_empty() && !names.contains(&name) {
            names.push(name);
        }
    }

    names
}
