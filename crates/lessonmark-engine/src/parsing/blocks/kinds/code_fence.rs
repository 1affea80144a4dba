#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FenceKind {
    Backticks,
    Tildes,
}

/// An opening fence line: its kind and optional info string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FenceOpen {
    pub kind: FenceKind,
    pub language: Option<String>,
}

pub struct CodeFence;

impl CodeFence {
    pub const BACKTICKS: &'static str = "```";
    pub const TILDES: &'static str = "~~~";

    pub fn kind(line: &str) -> Option<FenceKind> {
        let t = line.trim();
        if t.starts_with(Self::BACKTICKS) {
            Some(FenceKind::Backticks)
        } else if t.starts_with(Self::TILDES) {
            Some(FenceKind::Tildes)
        } else {
            None
        }
    }

    pub fn open(line: &str) -> Option<FenceOpen> {
        let kind = Self::kind(line)?;
        let info = line
            .trim()
            .trim_start_matches(['`', '~'])
            .split_whitespace()
            .next()
            .map(str::to_string);
        Some(FenceOpen {
            kind,
            language: info,
        })
    }

    /// A closing fence is a bare delimiter of the same kind.
    pub fn closes(kind: FenceKind, line: &str) -> bool {
        let t = line.trim();
        let delim = match kind {
            FenceKind::Backticks => '`',
            FenceKind::Tildes => '~',
        };
        t.len() >= 3 && t.chars().all(|c| c == delim)
    }
}
