//! `Accept` content negotiation

/// Pick the media type to serve from `available` (default first).
///
/// Each available type takes the quality of the most specific matching range
/// in `accept`. The highest non-zero quality wins, ties going to the earlier
/// type. No `Accept` header means the default.
pub fn negotiate<'a>(accept: Option<&str>, available: &[&'a str]) -> Option<&'a str> {
    let ranges = match accept.map(str::trim).filter(|a| !a.is_empty()) {
        Some(accept) => parse_accept(accept),
        None => return available.first().copied(),
    };

    let mut best: Option<(&'a str, f32)> = None;
    for &candidate in available {
        let Some(q) = quality(&ranges, candidate) else {
            continue;
        };
        if q > 0.0 && best.map_or(true, |(_, best_q)| q > best_q) {
            best = Some((candidate, q));
        }
    }
    best.map(|(media_type, _)| media_type)
}

#[derive(Debug)]
struct MediaRange {
    main: String,
    sub: String,
    q: f32,
}

impl MediaRange {
    /// 2 for an exact match, 1 for `type/*`, 0 for `*/*`
    fn specificity(&self, main: &str, sub: &str) -> Option<u8> {
        match (self.main.as_str(), self.sub.as_str()) {
            ("*", "*") => Some(0),
            (m, "*") if m.eq_ignore_ascii_case(main) => Some(1),
            (m, s) if m.eq_ignore_ascii_case(main) && s.eq_ignore_ascii_case(sub) => Some(2),
            _ => None,
        }
    }
}

fn parse_accept(accept: &str) -> Vec<MediaRange> {
    accept
        .split(',')
        .filter_map(|item| {
            let mut parts = item.split(';');
            let (main, sub) = parts.next()?.trim().split_once('/')?;
            let q = parts
                .filter_map(|p| p.split_once('='))
                .find(|(k, _)| k.trim().eq_ignore_ascii_case("q"))
                .and_then(|(_, v)| v.trim().parse::<f32>().ok())
                .unwrap_or(1.0)
                .clamp(0.0, 1.0);
            Some(MediaRange {
                main: main.trim().to_string(),
                sub: sub.trim().to_string(),
                q,
            })
        })
        .collect()
}

fn quality(ranges: &[MediaRange], media_type: &str) -> Option<f32> {
    let essence = media_type.split(';').next().unwrap_or(media_type).trim();
    let (main, sub) = essence.split_once('/')?;
    ranges
        .iter()
        .filter_map(|r| r.specificity(main, sub).map(|s| (s, r.q)))
        .max_by(|a, b| a.0.cmp(&b.0).then(a.1.total_cmp(&b.1)))
        .map(|(_, q)| q)
}
