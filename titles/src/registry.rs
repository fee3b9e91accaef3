//! Title registry for checksum-based dispatch.
//!
//! Each title self-registers via [`inventory::submit!`] with a
//! [`TitleEntry`] containing its CLI name, the MD5 of the cartridge image
//! it interprets, and a factory function. The harness finds the right
//! title for a cartridge at runtime without any central list.

use ramwatch_core::core::title::Title;

/// Describes a supported cartridge.
pub struct TitleEntry {
    /// CLI name used to select this title (e.g., "pong").
    pub name: &'static str,
    /// MD5 of the cartridge image, lowercase hex.
    pub md5: &'static str,
    /// Factory: a fresh title, already reset.
    pub create: fn() -> Box<dyn Title>,
}

impl TitleEntry {
    pub const fn new(
        name: &'static str,
        md5: &'static str,
        create: fn() -> Box<dyn Title>,
    ) -> Self {
        Self { name, md5, create }
    }
}

inventory::collect!(TitleEntry);

/// Return all registered titles, sorted by name.
pub fn all() -> Vec<&'static TitleEntry> {
    let mut entries: Vec<_> = inventory::iter::<TitleEntry>.into_iter().collect();
    entries.sort_by_key(|e| e.name);
    entries
}

/// Look up a title by its CLI name.
pub fn find(name: &str) -> Option<&'static TitleEntry> {
    inventory::iter::<TitleEntry>
        .into_iter()
        .find(|e| e.name == name)
}

/// Look up a title by cartridge MD5 (hex, any case).
pub fn find_by_md5(md5: &str) -> Option<&'static TitleEntry> {
    inventory::iter::<TitleEntry>
        .into_iter()
        .find(|e| e.md5.eq_ignore_ascii_case(md5))
}

/// MD5 of a cartridge image as lowercase hex.
pub fn rom_md5(rom: &[u8]) -> String {
    format!("{:x}", md5::compute(rom))
}

/// Identify a cartridge image by hashing it.
pub fn identify(rom: &[u8]) -> Option<&'static TitleEntry> {
    find_by_md5(&rom_md5(rom))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_is_sorted_and_complete() {
        let names: Vec<_> = all().iter().map(|e| e.name).collect();
        assert_eq!(names, vec!["backgammon", "pong"]);
    }

    #[test]
    fn find_by_name() {
        let entry = find("pong").unwrap();
        assert_eq!(entry.md5, "60e0ea3cbe0913d39803477945e9e5ec");
        assert!(find("joust").is_none());
    }

    #[test]
    fn find_by_md5_ignores_case() {
        let entry = find_by_md5("8556B42AA05F94BC29FF39C39B11BFF4").unwrap();
        assert_eq!(entry.name, "backgammon");
    }

    #[test]
    fn entries_agree_with_their_titles() {
        for entry in all() {
            let title = (entry.create)();
            assert_eq!(title.name(), entry.name);
            assert_eq!(title.md5(), entry.md5);
        }
    }

    #[test]
    fn rom_md5_known_vector() {
        assert_eq!(rom_md5(b""), "d41d8cd98f00b204e9800998ecf8427e");
        assert_eq!(rom_md5(b"abc"), "900150983cd24fb0d6963f7d28e17f72");
    }

    #[test]
    fn identify_unknown_rom() {
        assert!(identify(&[0u8; 2048]).is_none());
    }
}
