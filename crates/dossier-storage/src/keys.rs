//! Shared key generation for storage backends.
//!
//! Key format: `{contact_id}/{NN}-{canonical slot name}{extension}`.

use dossier_core::DocumentSlot;

/// Extension of a client-supplied file name, including the leading dot.
///
/// Only the base name is considered (both `/` and `\` separate directories). Leading dots
/// do not start an extension, so `.bashrc` has none, and a trailing dot yields `"."`.
/// Case is preserved.
pub fn file_extension(filename: &str) -> &str {
    let base = filename.rsplit(['/', '\\']).next().unwrap_or(filename);
    let stem_start = base.len() - base.trim_start_matches('.').len();

    match base[stem_start..].rfind('.') {
        Some(idx) => &base[stem_start + idx..],
        None => "",
    }
}

/// Generate the destination key for one uploaded document.
///
/// `sequence` is the file's 1-based position in the request; it is zero-padded to two digits.
/// The function is pure: the same inputs always produce the same key.
pub fn destination_key(
    contact_id: &str,
    sequence: usize,
    slot: DocumentSlot,
    original_filename: &str,
) -> String {
    format!(
        "{}/{:02}-{}{}",
        contact_id,
        sequence,
        slot.canonical_name(),
        file_extension(original_filename)
    )
}
