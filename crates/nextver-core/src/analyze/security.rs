//! Security, memory-safety, and crash vocabulary extraction.
//!
//! Counts case-insensitive, word-bounded vocabulary hits over the diff and
//! the commit log, then folds them into a weighted total and a coarse risk
//! tier for the report.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// Broad security vocabulary.
    static ref SECURITY_VOCAB: Regex = Regex::new(
        r"(?i)\b(security|vuln|exploit|breach|attack|threat|malware|virus|trojan|backdoor|rootkit|phishing|ddos|overflow|injection|xss|csrf|sqli|rce|ssrf|xxe|privilege|escalation|bypass|mitigation|hardening|sandbox|auth|encryption|decryption|tls|ssl|certificate|secret|token|leak|expos|traversal)\b"
    )
    .unwrap();
    /// CVE identifiers.
    static ref CVE: Regex = Regex::new(r"(?i)\bCVE-[0-9]{4}-[0-9]{4,7}\b").unwrap();
    /// Memory-safety phrases.
    static ref MEMORY_SAFETY: Regex = Regex::new(
        r"(?i)\b(buffer[\- _]?overflow|stack[\- _]?overflow|heap[\- _]?overflow|use[\- _]?after[\- _]?free|double[\- _]?free|null[\- _]?pointer|dangling[\- _]?pointer|out[\- _]?of[\- _]?bounds|oob|memory[\- _]?leak|format[\- _]?string|integer[\- _]?overflow|signedness|race[\- _]?condition|data[\- _]?race|deadlock)\b"
    )
    .unwrap();
    /// Crash phrases.
    static ref CRASH: Regex = Regex::new(
        r"(?i)\b(segfault|segmentation\s+fault|crash|abort|assert|panic|fatal\s+error|core\s+dump|stack\s+trace)\b"
    )
    .unwrap();
}

/// Weight for security vocabulary in commit messages.
const WEIGHT_COMMITS: u64 = 1;
/// Weight for security vocabulary in the diff.
const WEIGHT_DIFF: u64 = 1;
/// Weight for CVE identifiers.
const WEIGHT_CVE: u64 = 3;
/// Weight for memory-safety phrases.
const WEIGHT_MEMORY: u64 = 2;
/// Weight for crash phrases.
const WEIGHT_CRASH: u64 = 1;

/// Coarse risk tier derived from the weighted total.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Risk {
    /// No security signal at all.
    None,
    /// Weighted total 1..4.
    Low,
    /// Weighted total 5..14.
    Medium,
    /// Weighted total 15 and above.
    High,
}

impl std::fmt::Display for Risk {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::None => write!(f, "none"),
            Self::Low => write!(f, "low"),
            Self::Medium => write!(f, "medium"),
            Self::High => write!(f, "high"),
        }
    }
}

/// Raw counters from the security analysis.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SecurityResults {
    /// Security vocabulary hits in commit messages.
    pub security_keywords_commits: u64,
    /// Security vocabulary hits in the diff.
    pub security_patterns_diff: u64,
    /// CVE identifiers in the diff.
    pub cve_patterns: u64,
    /// Memory-safety phrases in the diff.
    pub memory_safety_issues: u64,
    /// Crash phrases in the diff.
    pub crash_fixes: u64,
}

impl SecurityResults {
    /// Weighted total: `1·commits + 1·diff + 3·cve + 2·memory + 1·crash`.
    pub const fn weighted_total(&self) -> u64 {
        WEIGHT_COMMITS * self.security_keywords_commits
            + WEIGHT_DIFF * self.security_patterns_diff
            + WEIGHT_CVE * self.cve_patterns
            + WEIGHT_MEMORY * self.memory_safety_issues
            + WEIGHT_CRASH * self.crash_fixes
    }

    /// Risk tier for the weighted total.
    pub const fn risk(&self) -> Risk {
        match self.weighted_total() {
            0 => Risk::None,
            1..=4 => Risk::Low,
            5..=14 => Risk::Medium,
            _ => Risk::High,
        }
    }
}

fn count(re: &Regex, text: &str) -> u64 {
    re.find_iter(text).count() as u64
}

/// Extract security signals from the diff and log streams.
pub fn analyze_security(diff: &str, log: &str) -> SecurityResults {
    SecurityResults {
        security_keywords_commits: count(&SECURITY_VOCAB, log),
        security_patterns_diff: count(&SECURITY_VOCAB, diff),
        cve_patterns: count(&CVE, diff),
        memory_safety_issues: count(&MEMORY_SAFETY, diff),
        crash_fixes: count(&CRASH, diff),
    }
}
