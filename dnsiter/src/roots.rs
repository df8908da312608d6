//! The root server hints: `spec.md` section 1 carves this out as an
//! external collaborator the core resolver is "oblivious to".

use std::fs;
use std::net::Ipv4Addr;
use std::path::Path;

/// The 13 IANA root server IPv4 addresses, `a.root-servers.net`
/// through `m.root-servers.net`.
const BUILTIN_ROOT_HINTS: [Ipv4Addr; 13] = [
    Ipv4Addr::new(198, 41, 0, 4),
    Ipv4Addr::new(199, 9, 14, 201),
    Ipv4Addr::new(192, 33, 4, 12),
    Ipv4Addr::new(199, 7, 91, 13),
    Ipv4Addr::new(192, 203, 230, 10),
    Ipv4Addr::new(192, 5, 5, 241),
    Ipv4Addr::new(192, 112, 36, 4),
    Ipv4Addr::new(198, 97, 190, 53),
    Ipv4Addr::new(192, 36, 148, 17),
    Ipv4Addr::new(192, 58, 128, 30),
    Ipv4Addr::new(193, 0, 14, 129),
    Ipv4Addr::new(199, 7, 83, 42),
    Ipv4Addr::new(202, 12, 27, 33),
];

/// The built-in root server list.
#[must_use]
pub fn builtin() -> Vec<Ipv4Addr> {
    BUILTIN_ROOT_HINTS.to_vec()
}

/// Parse a root hints file: one `name address` pair per line,
/// blank lines and `;`-prefixed comments ignored. Addresses that
/// fail to parse are skipped with a warning rather than aborting the
/// whole file.
///
/// # Errors
///
/// If the file cannot be read.
pub fn from_file(path: &Path) -> std::io::Result<Vec<Ipv4Addr>> {
    let contents = fs::read_to_string(path)?;
    let mut hints = Vec::new();

    for line in contents.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with(';') {
            continue;
        }

        match line.split_whitespace().nth(1) {
            Some(address) => match address.parse::<Ipv4Addr>() {
                Ok(address) => hints.push(address),
                Err(error) => tracing::warn!(%line, %error, "could not parse root hint address"),
            },
            None => tracing::warn!(%line, "malformed root hints line, expected 'name address'"),
        }
    }

    Ok(hints)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_has_thirteen_addresses() {
        assert_eq!(builtin().len(), 13);
    }

    #[test]
    fn parses_name_address_lines_and_skips_comments() {
        let dir = std::env::temp_dir().join(format!("dnsiter-hints-test-{}", std::process::id()));
        fs::write(
            &dir,
            "; comment\na.root-servers.net 198.41.0.4\n\nb.root-servers.net not-an-ip\n",
        )
        .unwrap();

        let hints = from_file(&dir).unwrap();
        fs::remove_file(&dir).ok();

        assert_eq!(hints, vec![Ipv4Addr::new(198, 41, 0, 4)]);
    }
}
