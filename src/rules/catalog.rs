//! Dangerous command catalog for Bash operations
//!
//! The catalog is an ordered table: when several rules match a command, the
//! one that appears first wins. More specific rules (deleting `/`, appending
//! to `/etc/passwd`) therefore sit ahead of the broader rules that would also
//! match them.
//!
//! Every pattern is compiled case-insensitively and searched anywhere in the
//! raw command string.

use once_cell::sync::Lazy;
use regex::{RegexSet, RegexSetBuilder};

use crate::error::ValidatorError;
use crate::rules::{Family, Rule};

/// The full ordered rule table
pub const RULES: &[Rule] = &[
    // ------------------------------------------------------------------
    // Privilege escalation
    // ------------------------------------------------------------------
    Rule::new(
        "sudo",
        Family::PrivilegeEscalation,
        r"\bsudo(?:[\s;&|)`]|$)",
        "Running commands with root privileges is prohibited",
    ),
    Rule::new(
        "su",
        Family::PrivilegeEscalation,
        r"\bsu(?:[\s;&|)`]|$)",
        "Switching users is prohibited",
    ),
    Rule::new(
        "doas-pkexec",
        Family::PrivilegeEscalation,
        r"\b(?:doas|pkexec)(?:[\s;&|)`]|$)",
        "Privilege elevation is prohibited",
    ),
    // ------------------------------------------------------------------
    // Destructive filesystem operations (specific targets first)
    // ------------------------------------------------------------------
    Rule::new(
        "rm-root",
        Family::DestructiveFilesystem,
        r#"\brm\s+(?:-{1,2}[a-z-]*\s+)+/\*?(?:[\s;&|)'"`]|$)"#,
        "Deleting the root directory is prohibited",
    ),
    Rule::new(
        "rm-home",
        Family::DestructiveFilesystem,
        r#"\brm\s+(?:-{1,2}[a-z-]*\s+)+(?:~|\$home|\$\{home\})/?\*?(?:[\s;&|)'"`]|$)"#,
        "Deleting the home directory is dangerous",
    ),
    Rule::new(
        "rm-cwd",
        Family::DestructiveFilesystem,
        r#"\brm\s+(?:-{1,2}[a-z-]*\s+)+\.{1,2}/?\*?(?:[\s;&|)'"`]|$)"#,
        "Deleting the current directory is dangerous",
    ),
    Rule::new(
        "rm-recursive-wildcard",
        Family::DestructiveFilesystem,
        r"\brm\s+(?:-{1,2}[a-z-]*\s+)*(?:-[a-z]*r[a-z]*|--recursive)\s+(?:-{1,2}[a-z-]*\s+)*\*",
        "Recursively deleting every file is extremely dangerous",
    ),
    Rule::new(
        "rm-system-path",
        Family::SystemFiles,
        r#"\brm\s+(?:[^\s;&|]+\s+)*/(?:etc|boot|usr|bin|sbin|var|lib|lib64|opt)(?:[/\s;&|)'"`]|$)"#,
        "Deleting system files is dangerous",
    ),
    Rule::new(
        "rm-recursive",
        Family::DestructiveFilesystem,
        r"\brm\s+(?:[^\s;&|]+\s+)*(?:-[a-z]*r[a-z]*|--recursive)(?:\s|$)",
        "Recursive deletion is very dangerous",
    ),
    Rule::new(
        "rm-force-path",
        Family::DestructiveFilesystem,
        r"\brm\s+(?:[^\s;&|]+\s+)*(?:-[a-z]*f[a-z]*|--force)\s+(?:[^\s;&|]+\s+)*[^\s;&|]*/[^\s;&|]",
        "Forced deletion is dangerous",
    ),
    Rule::new(
        "find-delete",
        Family::DestructiveFilesystem,
        r"\bfind\s+[^;&|]*\s-delete\b",
        "Deleting files through find is dangerous",
    ),
    Rule::new(
        "find-exec-rm",
        Family::DestructiveFilesystem,
        r"\bfind\s+[^;&|]*\s-(?:exec|execdir|ok)\s+(?:\S*/)?rm\b",
        "Deleting files through find -exec is dangerous",
    ),
    Rule::new(
        "xargs-rm",
        Family::DestructiveFilesystem,
        r"\bxargs\s+(?:-\S+\s+)*(?:\S*/)?rm\b",
        "Deleting files through xargs is dangerous",
    ),
    // ------------------------------------------------------------------
    // Disk-level operations
    // ------------------------------------------------------------------
    Rule::new(
        "dd",
        Family::DiskOperation,
        r"\bdd\s+",
        "Direct disk operations are extremely dangerous",
    ),
    Rule::new(
        "fdisk",
        Family::DiskOperation,
        r"\b(?:fdisk|sfdisk|gdisk|cfdisk)\s+",
        "Partition table manipulation is dangerous",
    ),
    Rule::new(
        "parted",
        Family::DiskOperation,
        r"\bparted\s+",
        "Partition table manipulation is dangerous",
    ),
    Rule::new(
        "mkfs",
        Family::DiskOperation,
        r"\bmkfs(?:\.[a-z0-9]+)?\s+",
        "Creating a filesystem is dangerous",
    ),
    Rule::new(
        "wipefs",
        Family::DiskOperation,
        r"\bwipefs\s+",
        "Erasing filesystem signatures is dangerous",
    ),
    // ------------------------------------------------------------------
    // System power and service control
    // ------------------------------------------------------------------
    Rule::new(
        "systemctl-power",
        Family::SystemControl,
        r"\bsystemctl\s+(?:-\S+\s+)*(?:poweroff|reboot|halt|shutdown|kexec)\b",
        "Controlling system power through systemctl is prohibited",
    ),
    Rule::new(
        "init-runlevel",
        Family::SystemControl,
        r"\b(?:tel)?init\s+[06](?:[\s;&|]|$)",
        "Halting or rebooting the system is prohibited",
    ),
    Rule::new(
        "shutdown",
        Family::SystemControl,
        r"\bshutdown(?:[\s;&|)`]|$)",
        "System shutdown is prohibited",
    ),
    Rule::new(
        "poweroff",
        Family::SystemControl,
        r"\bpoweroff(?:[\s;&|)`]|$)",
        "Powering off the system is prohibited",
    ),
    Rule::new(
        "reboot",
        Family::SystemControl,
        r"\breboot(?:[\s;&|)`]|$)",
        "System reboot is prohibited",
    ),
    Rule::new(
        "halt",
        Family::SystemControl,
        r"\bhalt(?:[\s;&|)`]|$)",
        "Halting the system is prohibited",
    ),
    Rule::new(
        "service-stop",
        Family::SystemControl,
        r"\bservice\s+\S+\s+(?:stop|restart)\s*(?:[;&|]|$)",
        "Stopping or restarting services is dangerous",
    ),
    // ------------------------------------------------------------------
    // Permission and ownership changes
    // ------------------------------------------------------------------
    Rule::new(
        "chmod-recursive-777-all",
        Family::Permissions,
        r"\bchmod\s+(?:-r|--recursive)\s+0?777\s+(?:[^\s;&|]+\s+)*(?:\*|/)(?:[\s;&|]|$)",
        "Recursively granting full permissions on every file is extremely dangerous",
    ),
    Rule::new(
        "chmod-recursive-777",
        Family::Permissions,
        r"\bchmod\s+(?:-r|--recursive)\s+0?777\b",
        "Recursively granting full permissions is extremely dangerous",
    ),
    Rule::new(
        "chmod-777",
        Family::Permissions,
        r"\bchmod\s+(?:-\S+\s+)*0?777\b",
        "Granting full permissions to everyone is dangerous",
    ),
    Rule::new(
        "chmod-world-rwx",
        Family::Permissions,
        r"\bchmod\s+(?:-\S+\s+)*[ugoa]*[ago]\+rwx\b",
        "Granting full permissions to everyone is dangerous",
    ),
    Rule::new(
        "chmod-recursive-666",
        Family::Permissions,
        r"\bchmod\s+(?:-r|--recursive)\s+0?666\b",
        "Recursively granting write permission is dangerous",
    ),
    Rule::new(
        "chown-root-system",
        Family::Permissions,
        r"\bchown\s+(?:-r|--recursive)\s+root(?::root)?\s+/(?:[\s;&|]|$)",
        "Handing the whole system to root is prohibited",
    ),
    Rule::new(
        "chown-root",
        Family::Permissions,
        r"\bchown\s+(?:-\S+\s+)*root\b",
        "Changing ownership to root is dangerous",
    ),
    // ------------------------------------------------------------------
    // Process kill operations
    // ------------------------------------------------------------------
    Rule::new(
        "kill-init",
        Family::ProcessKill,
        r"\bkill\s+-(?:9|kill|sigkill)\s+1\s*(?:[;&|]|$)",
        "Killing the init process is prohibited",
    ),
    Rule::new(
        "kill-all-processes",
        Family::ProcessKill,
        r"\bkill\s+-(?:9|kill|sigkill)\s+-1\b",
        "Killing every process is prohibited",
    ),
    Rule::new(
        "killall-force",
        Family::ProcessKill,
        r"\bkillall\s+-(?:9|kill|sigkill)\s+",
        "Force-killing processes in bulk is dangerous",
    ),
    Rule::new(
        "pkill-force",
        Family::ProcessKill,
        r"\bpkill\s+-(?:9|kill|sigkill)\s+",
        "Force-killing processes by name is dangerous",
    ),
    // ------------------------------------------------------------------
    // System file tampering
    // ------------------------------------------------------------------
    Rule::new(
        "disk-device-write",
        Family::SystemFiles,
        r">\s*/dev/(?:sd[a-z]|nvme\d|hd[a-z]|vd[a-z]|xvd[a-z]|mmcblk\d)",
        "Writing to a disk device is dangerous",
    ),
    Rule::new(
        "credential-file-append",
        Family::SystemFiles,
        r">>\s*/etc/(?:passwd|shadow|gshadow|group|sudoers)\b",
        "Appending to critical system files is dangerous",
    ),
    Rule::new(
        "credential-file-overwrite",
        Family::SystemFiles,
        r">\s*/etc/(?:passwd|shadow|gshadow|group|sudoers)\b",
        "Overwriting critical system files is prohibited",
    ),
    Rule::new(
        "credential-file-tee",
        Family::SystemFiles,
        r"\btee\s+(?:-\S+\s+)*/etc/(?:passwd|shadow|gshadow|group|sudoers)\b",
        "Writing to critical system files through tee is prohibited",
    ),
    Rule::new(
        "truncate-system",
        Family::SystemFiles,
        r"\btruncate\s+[^;&|]*/(?:etc|boot|usr|bin|sbin)/",
        "Truncating system files is dangerous",
    ),
    Rule::new(
        "shred-system",
        Family::SystemFiles,
        r"\bshred\s+[^;&|]*/(?:etc|boot|usr|bin|sbin)/",
        "Securely erasing system files is dangerous",
    ),
    // ------------------------------------------------------------------
    // Resource exhaustion
    // ------------------------------------------------------------------
    Rule::new(
        "fork-bomb",
        Family::ResourceExhaustion,
        r":\s*\(\s*\)\s*\{\s*:\s*\|\s*:\s*&\s*\}\s*;\s*:",
        "Fork bombs are prohibited",
    ),
    Rule::new(
        "infinite-source-fill",
        Family::ResourceExhaustion,
        r"\bcat\s+/dev/(?:zero|urandom|random)\s*>",
        "Filling the disk from an infinite source is dangerous",
    ),
    // ------------------------------------------------------------------
    // Indirect and injected execution
    // ------------------------------------------------------------------
    Rule::new(
        "chain-semicolon",
        Family::IndirectExecution,
        r";\s*(?:sudo\b|rm\s+-rf?|dd\b|shutdown\b|reboot\b)",
        "Possible command injection",
    ),
    Rule::new(
        "chain-and",
        Family::IndirectExecution,
        r"&&\s*(?:sudo\b|rm\s+-rf?|dd\b|shutdown\b|reboot\b)",
        "Dangerous operation through command chaining",
    ),
    Rule::new(
        "chain-or",
        Family::IndirectExecution,
        r"\|\|\s*(?:sudo\b|rm\s+-rf?|dd\b|shutdown\b|reboot\b)",
        "Dangerous operation through command chaining",
    ),
    Rule::new(
        "chain-pipe",
        Family::IndirectExecution,
        r"\|\s*(?:sudo\b|rm\s+-rf?|dd\b|shutdown\b)",
        "Dangerous operation through a pipe",
    ),
    Rule::new(
        "backtick-rm",
        Family::IndirectExecution,
        r"`[^`]*\brm\s+-rf?[^`]*`",
        "Dangerous operation inside backquote substitution",
    ),
    Rule::new(
        "subst-rm",
        Family::IndirectExecution,
        r"\$\([^)]*\brm\s+-rf?[^)]*\)",
        "Dangerous operation inside command substitution",
    ),
    Rule::new(
        "backtick-sudo",
        Family::IndirectExecution,
        r"`[^`]*\bsudo\b[^`]*`",
        "Root operation inside backquote substitution",
    ),
    Rule::new(
        "subst-sudo",
        Family::IndirectExecution,
        r"\$\([^)]*\bsudo\b[^)]*\)",
        "Root operation inside command substitution",
    ),
    Rule::new(
        "shell-c-rm",
        Family::IndirectExecution,
        r#"\b(?:sh|bash|zsh|ksh|dash)\s+-c\s+["'].*\brm\s+-rf?.*["']"#,
        "Dangerous operation through an inline shell script",
    ),
    Rule::new(
        "shell-c-sudo",
        Family::IndirectExecution,
        r#"\b(?:sh|bash|zsh|ksh|dash)\s+-c\s+["'].*\bsudo\b.*["']"#,
        "Root operation through an inline shell script",
    ),
    Rule::new(
        "eval-rm",
        Family::IndirectExecution,
        r#"\beval\s+["'].*\brm\s+-rf?.*["']"#,
        "Dangerous operation through eval",
    ),
    Rule::new(
        "eval-sudo",
        Family::IndirectExecution,
        r#"\beval\s+["'].*\bsudo\b.*["']"#,
        "Root operation through eval",
    ),
    Rule::new(
        "exec-rm",
        Family::IndirectExecution,
        r"\bexec\s+.*\brm\s+-rf?",
        "Dangerous operation through exec",
    ),
    Rule::new(
        "exec-sudo",
        Family::IndirectExecution,
        r"\bexec\s+.*\bsudo\b",
        "Root operation through exec",
    ),
    Rule::new(
        "source-script",
        Family::IndirectExecution,
        r"\bsource\s+\S*\.(?:sh|bash)\w*",
        "Sourcing external scripts is dangerous",
    ),
    Rule::new(
        "dot-source-script",
        Family::IndirectExecution,
        r"(?:^|[\s;&|(])\.\s+\S*\.(?:sh|bash)\w*",
        "Sourcing external scripts is dangerous",
    ),
    Rule::new(
        "echo-pipe-shell",
        Family::IndirectExecution,
        r#"\becho\s+["'].*\brm\s+-rf?.*["']\s*\|\s*(?:sh|bash|zsh)\b"#,
        "Dangerous execution through a pipe to a shell",
    ),
    Rule::new(
        "printf-pipe-shell",
        Family::IndirectExecution,
        r#"\bprintf\s+["'].*\brm\s+-rf?.*["']\s*\|\s*(?:sh|bash|zsh)\b"#,
        "Dangerous execution through a pipe to a shell",
    ),
];

/// Process-wide catalog, compiled on first use
static GLOBAL: Lazy<Result<RuleCatalog, regex::Error>> = Lazy::new(RuleCatalog::compile);

/// An ordered rule table compiled into a single case-insensitive [`RegexSet`]
///
/// Index `i` of the set corresponds to `rules[i]`, so the lowest matching
/// index is the first matching rule in catalog order.
#[derive(Debug)]
pub struct RuleCatalog {
    rules: &'static [Rule],
    set: RegexSet,
}

impl RuleCatalog {
    /// Compile the built-in rule table
    pub fn compile() -> Result<Self, regex::Error> {
        Self::from_rules(RULES)
    }

    /// Compile an arbitrary ordered rule table
    pub fn from_rules(rules: &'static [Rule]) -> Result<Self, regex::Error> {
        let set = RegexSetBuilder::new(rules.iter().map(|r| r.pattern))
            .case_insensitive(true)
            .build()?;

        Ok(Self { rules, set })
    }

    /// The shared built-in catalog
    pub fn global() -> Result<&'static RuleCatalog, ValidatorError> {
        GLOBAL
            .as_ref()
            .map_err(|e| ValidatorError::Catalog(e.clone()))
    }

    /// Rules in priority order
    pub fn rules(&self) -> &'static [Rule] {
        self.rules
    }

    pub(crate) fn set(&self) -> &RegexSet {
        &self.set
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}
