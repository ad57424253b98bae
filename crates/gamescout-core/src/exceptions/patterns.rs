/// Built-in auto-exclusion pattern tables.
///
/// These are data, not code: the matcher in [`super::AutoExcluder`] is
/// independent of table size, so tests substitute tiny tables and this
/// file can grow without touching any logic. All matching against these
/// tables is case-insensitive on the filename stem.

/// Keywords matched as whole words within a stem. Word boundaries are
/// any non-alphanumeric character or the ends of the stem, so `"setup"`
/// catches `game_setup` and `setup-v2` but not `mysetupvar`.
pub const KEYWORDS: &[&str] = &[
    // Installation and setup
    "setup", "install", "installer", "installshield", "uninstall",
    "update", "updater", "upgrade", "patch", "patcher",
    // Configuration
    "config", "configure", "settings", "configtool",
    // System redistributables
    "vcredist", "directx", "dxsetup", "runtime", "dotnet", "redist",
    // Documentation
    "readme", "license", "credits", "docs",
    // Tools that ship beside games but are not games
    "keygen", "trainer", "cheat", "registration", "register", "server",
    "uploader", "leveltool", "editor", "benchmark",
];

/// Stems excluded on exact (case-folded) match.
pub const EXACT_STEMS: &[&str] = &[
    // Uninstaller family
    "unins000", "unins001", "unins002",
    // Redistributables
    "dxsetup", "vcredist", "vcredist_x86", "vcredist_x64",
    // Installers
    "setup", "installer", "install",
    // Utilities commonly found in game folders
    "mapmaker", "joystick", "unzip", "lha", "perl", "reg", "signtool",
    "oggenc2", "lame", "w9xpopen", "cwsdpmi", "elevate", "firstrun",
    "remove", "tools", "reader", "encrypt",
];

/// Stem suffixes that mark utility builds of an executable.
pub const SUFFIXES: &[&str] = &[
    "-setup", "-installer", "-install", "-uninstall", "-unins",
    "-update", "-updater", "-upgrade", "-patch", "-patcher",
    "-config", "-configure", "-configurator", "-register",
    "-checker", "-diagnostic", "-repair", "-cleanup",
    "-tool", "-utility", "-helper", "-manager", "-launcher",
    "-editor", "-viewer", "-monitor", "-scanner", "-tester",
    "-debug", "-beta", "-alpha", "-demo", "-trial",
    "-server", "-client", "-console", "-cli",
    "-32bit", "-64bit", "-x86", "-x64", "-win32", "-win64",
    "-data", "-backup", "-temp", "-cache", "-log",
    "-crash", "-dump", "-report", "-export", "-import",
];

/// Stems that disqualify a `.bat`/`.cmd` candidate specifically. Batch
/// files with these names are helper scripts, never launchers.
pub const BATCH_STEMS: &[&str] = &["help", "readme", "change", "site", "emake"];

/// Stem prefixes excluded outright (uninstaller and runtime families
/// with numbered or suffixed variants).
pub const STEM_PREFIXES: &[&str] = &["unins", "uninst", "msvc", "vbrun", "update_"];
