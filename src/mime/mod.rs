//! Media file type resolution.
//!
//! Maps filename extensions to content-directory object classes and
//! transport protocol descriptors. The table is the sole content filter:
//! a file whose extension has no row here is excluded from the catalog
//! entirely.

/// One row of the static type table.
#[derive(Debug, Clone, Copy)]
pub struct MimeRule {
    /// Filename extension, lowercase, without the dot.
    pub extension: &'static str,
    /// Content-directory object class.
    pub class: &'static str,
    /// MIME type used in the protocol descriptor.
    pub mime: &'static str,
    /// Optional DLNA profile tag carried in the descriptor's fourth field.
    pub profile: Option<&'static str>,
}

/// Result of classifying a filename.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    /// Content-directory object class, e.g. `object.item.videoItem.movie`.
    pub class: &'static str,
    /// Full protocol descriptor, e.g. `http-get:*:video/mpeg:*`.
    pub protocol_info: String,
}

const CLASS_MOVIE: &str = "object.item.videoItem.movie";
const CLASS_MUSIC: &str = "object.item.audioItem.musicTrack";
const CLASS_PHOTO: &str = "object.item.imageItem.photo";
const CLASS_PLAYLIST: &str = "object.item.playlistItem";
const CLASS_TEXT: &str = "object.item.textItem";

/// Object class assigned to every container entry.
pub const CLASS_CONTAINER: &str = "object.container";

/// The static type table. First case-insensitive extension match wins.
///
/// Note: `mp4`/`m4a` are classified as audio tracks with an audio/mpeg
/// descriptor. That matches what deployed control points were probed
/// against; changing it breaks playback on some renderers.
pub const MIME_RULES: &[MimeRule] = &[
    // Video files
    rule("asf", CLASS_MOVIE, "video/x-ms-asf"),
    rule("avi", CLASS_MOVIE, "video/x-msvideo"),
    rule("divx", CLASS_MOVIE, "video/x-msvideo"),
    rule("wmv", CLASS_MOVIE, "video/x-ms-wmv"),
    rule("mpeg", CLASS_MOVIE, "video/mpeg"),
    rule("mpg", CLASS_MOVIE, "video/mpeg"),
    rule("mpe", CLASS_MOVIE, "video/mpeg"),
    rule("vob", CLASS_MOVIE, "video/mpeg"),
    rule("m1v", CLASS_MOVIE, "video/mpeg"),
    rule("m2v", CLASS_MOVIE, "video/mpeg"),
    rule("m4v", CLASS_MOVIE, "video/mpeg"),
    rule("ts", CLASS_MOVIE, "video/mpeg"),
    rule("ogm", CLASS_MOVIE, "video/mpeg"),
    rule("mkv", CLASS_MOVIE, "video/mpeg"),
    rule("rmvb", CLASS_MOVIE, "video/mpeg"),
    rule("mov", CLASS_MOVIE, "video/quicktime"),
    rule("qt", CLASS_MOVIE, "video/quicktime"),
    // Audio files
    rule("mp2", CLASS_MUSIC, "audio/mpeg"),
    profiled("mp3", CLASS_MUSIC, "audio/mpeg", "MP3"),
    rule("mp4", CLASS_MUSIC, "audio/mpeg"),
    rule("m4a", CLASS_MUSIC, "audio/mpeg"),
    rule("ogg", CLASS_MUSIC, "application/ogg"),
    rule("wav", CLASS_MUSIC, "audio/x-wav"),
    rule("wma", CLASS_MUSIC, "audio/x-ms-wma"),
    rule("mka", CLASS_MUSIC, "audio/mpeg"),
    rule("ra", CLASS_MUSIC, "audio/x-pn-realaudio"),
    rule("rm", CLASS_MUSIC, "audio/x-pn-realaudio"),
    rule("ram", CLASS_MUSIC, "audio/x-pn-realaudio"),
    // Image files
    rule("bmp", CLASS_PHOTO, "image/x-ms-bmp"),
    rule("gif", CLASS_PHOTO, "image/gif"),
    profiled("jpeg", CLASS_PHOTO, "image/jpeg", "JPEG_LRG"),
    profiled("jpg", CLASS_PHOTO, "image/jpeg", "JPEG_LRG"),
    rule("jpe", CLASS_PHOTO, "image/jpeg"),
    rule("pcd", CLASS_PHOTO, "image/x-ms-bmp"),
    profiled("png", CLASS_PHOTO, "image/png", "PNG_LRG"),
    rule("pnm", CLASS_PHOTO, "image/x-portable-anymap"),
    rule("ppm", CLASS_PHOTO, "image/x-portable-pixmap"),
    // Playlist files
    rule("pls", CLASS_PLAYLIST, "audio/x-scpls"),
    rule("m3u", CLASS_PLAYLIST, "audio/mpegurl"),
    rule("asx", CLASS_PLAYLIST, "video/x-ms-asf"),
    // Subtitle files
    rule("srt", CLASS_TEXT, "text/srt"),
    rule("ssa", CLASS_TEXT, "text/ssa"),
    rule("sub", CLASS_TEXT, "text/sub"),
];

const fn rule(extension: &'static str, class: &'static str, mime: &'static str) -> MimeRule {
    MimeRule {
        extension,
        class,
        mime,
        profile: None,
    }
}

const fn profiled(
    extension: &'static str,
    class: &'static str,
    mime: &'static str,
    profile: &'static str,
) -> MimeRule {
    MimeRule {
        extension,
        class,
        mime,
        profile: Some(profile),
    }
}

impl MimeRule {
    /// Render the transport protocol descriptor for this rule.
    ///
    /// `http-get:*:<mime>:*`, with the trailing field replaced by a
    /// DLNA profile attribute when the rule carries a profile tag.
    #[must_use]
    pub fn protocol_info(&self) -> String {
        match self.profile {
            Some(profile) => format!("http-get:*:{}:DLNA.ORG_PN={}", self.mime, profile),
            None => format!("http-get:*:{}:*", self.mime),
        }
    }
}

/// The extension of a filename: the substring after the final `.`.
///
/// A name with no dot, or nothing after the final dot, has no extension.
fn extension(filename: &str) -> Option<&str> {
    match filename.rsplit_once('.') {
        Some((_, ext)) if !ext.is_empty() => Some(ext),
        _ => None,
    }
}

/// Classify a filename by its extension.
///
/// Returns `None` for unknown extensions, which excludes the file from
/// the catalog.
#[must_use]
pub fn classify(filename: &str) -> Option<Classification> {
    let ext = extension(filename)?;
    MIME_RULES
        .iter()
        .find(|r| r.extension.eq_ignore_ascii_case(ext))
        .map(|r| Classification {
            class: r.class,
            protocol_info: r.protocol_info(),
        })
}

/// Every rendered protocol descriptor, in table order.
///
/// Used by the connection manager's source protocol list.
#[must_use]
pub fn protocol_list() -> Vec<String> {
    MIME_RULES.iter().map(MimeRule::protocol_info).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_video() {
        let c = classify("movie.avi").unwrap();
        assert_eq!(c.class, "object.item.videoItem.movie");
        assert_eq!(c.protocol_info, "http-get:*:video/x-msvideo:*");
    }

    #[test]
    fn test_classify_case_insensitive() {
        assert_eq!(classify("MOVIE.AVI"), classify("movie.avi"));
        assert_eq!(classify("track.Mp3"), classify("track.mp3"));
    }

    #[test]
    fn test_classify_final_extension_only() {
        // Only the substring after the last dot counts.
        let c = classify("Movie.Title.2024.mkv").unwrap();
        assert_eq!(c.class, "object.item.videoItem.movie");
        assert!(classify("archive.mkv.bak").is_none());
    }

    #[test]
    fn test_classify_unknown_or_missing_extension() {
        assert!(classify("notes.xyz").is_none());
        assert!(classify("README").is_none());
        assert!(classify("trailing.").is_none());
        assert!(classify("").is_none());
    }

    #[test]
    fn test_mp4_is_audio() {
        // Legacy table quirk, kept for renderer compatibility.
        let c = classify("clip.mp4").unwrap();
        assert_eq!(c.class, "object.item.audioItem.musicTrack");
        assert_eq!(c.protocol_info, "http-get:*:audio/mpeg:*");
    }

    #[test]
    fn test_profile_tag_rendering() {
        let c = classify("song.mp3").unwrap();
        assert_eq!(c.protocol_info, "http-get:*:audio/mpeg:DLNA.ORG_PN=MP3");

        let c = classify("photo.jpg").unwrap();
        assert_eq!(c.protocol_info, "http-get:*:image/jpeg:DLNA.ORG_PN=JPEG_LRG");
    }

    #[test]
    fn test_subtitles_classified() {
        let c = classify("movie.srt").unwrap();
        assert_eq!(c.class, "object.item.textItem");
        assert_eq!(c.protocol_info, "http-get:*:text/srt:*");
    }

    #[test]
    fn test_protocol_list_matches_table() {
        let list = protocol_list();
        assert_eq!(list.len(), MIME_RULES.len());
        assert!(list.contains(&"http-get:*:video/mpeg:*".to_string()));
        assert!(list.contains(&"http-get:*:audio/mpeg:DLNA.ORG_PN=MP3".to_string()));
    }
}
