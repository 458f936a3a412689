//! Marker-level scanning of tool-invocation markup inside a growing text
//! buffer. The buffer may end mid-tag, mid-attribute, or mid-value; every
//! call is a pure function of the bytes seen so far.

use aho_corasick::AhoCorasick;

use crate::types::Parameter;

/// Parameter name used when no parameter markers parse and the interior text
/// is surfaced as a single best-effort value.
pub const SYNTHETIC_PARAMETER: &str = "raw";

const MARKERS: [&str; 6] = [
    "<function_calls>",
    "</function_calls>",
    "<invoke name=\"",
    "</invoke>",
    "<parameter name=\"",
    "</parameter>",
];

const MARKER_KINDS: [MarkerKind; 6] = [
    MarkerKind::BlockOpen,
    MarkerKind::BlockClose,
    MarkerKind::InvokeOpen,
    MarkerKind::InvokeClose,
    MarkerKind::ParameterOpen,
    MarkerKind::ParameterClose,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MarkerKind {
    BlockOpen,
    BlockClose,
    InvokeOpen,
    InvokeClose,
    ParameterOpen,
    ParameterClose,
}

#[derive(Debug, Clone, Copy)]
struct Hit {
    kind: MarkerKind,
    start: usize,
    end: usize,
}

/// One recognized invocation region pulled out of the buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScannedCall {
    pub name: String,
    /// In order of appearance. An entry with `complete: false` holds the
    /// value streamed so far.
    pub parameters: Vec<Parameter>,
    /// True only once `</invoke>` for this region has been seen.
    pub complete: bool,
    /// Marker-stripped interior text, for preview fallback when the chosen
    /// primary parameter turns out empty.
    pub fallback_text: Option<String>,
}

pub struct Scanner {
    automaton: AhoCorasick,
}

impl Scanner {
    pub fn new() -> Self {
        Self {
            // The needle set is a fixed array of short literals; construction
            // cannot fail for it.
            automaton: AhoCorasick::new(MARKERS).expect("literal marker set"),
        }
    }

    /// Extract the first invocation found in `buffer`, however truncated.
    /// Returns `None` for an empty buffer, a buffer without markers, or a
    /// buffer where no invocation name has streamed in yet.
    pub fn scan(&self, buffer: &str) -> Option<ScannedCall> {
        if buffer.is_empty() {
            return None;
        }
        let hits = self.hits(buffer);
        self.scan_from(buffer, &hits, 0).map(|(call, _)| call)
    }

    /// Extract every *completed* invocation in `buffer`, in order. Regions
    /// that never close are skipped, not propagated as errors.
    pub fn scan_all(&self, buffer: &str) -> Vec<ScannedCall> {
        let hits = self.hits(buffer);
        let mut calls = Vec::new();
        let mut cursor = 0usize;
        while let Some((call, resume)) = self.scan_from(buffer, &hits, cursor) {
            if call.complete {
                calls.push(call);
            }
            if resume <= cursor {
                break;
            }
            cursor = resume;
        }
        calls
    }

    fn hits(&self, buffer: &str) -> Vec<Hit> {
        self.automaton
            .find_iter(buffer)
            .map(|m| Hit {
                kind: MARKER_KINDS[m.pattern().as_usize()],
                start: m.start(),
                end: m.end(),
            })
            .collect()
    }

    /// Parse one invocation starting from hit index `start_hit`. Returns the
    /// call and the hit index to resume sibling scanning from.
    fn scan_from(
        &self,
        buffer: &str,
        hits: &[Hit],
        start_hit: usize,
    ) -> Option<(ScannedCall, usize)> {
        let mut search_from = start_hit;
        loop {
            let open_idx = hits[search_from..]
                .iter()
                .position(|h| h.kind == MarkerKind::InvokeOpen)?
                + search_from;
            let open = hits[open_idx];

            // The attribute value runs to the closing quote. Bound the search
            // at the next marker so a quote later in the stream is never
            // captured into the name.
            let attr_bound = hits
                .get(open_idx + 1)
                .map(|h| h.start)
                .unwrap_or(buffer.len());
            let attr = &buffer[open.end..attr_bound];

            let (name, body_start) = match attr.find('"') {
                Some(q) => {
                    let after_quote = open.end + q + 1;
                    let body = buffer[after_quote..attr_bound]
                        .find('>')
                        .map(|g| after_quote + g + 1);
                    (attr[..q].to_string(), body)
                }
                // Closing quote not streamed yet: the partial name is still
                // useful, minus any half-written marker at the buffer edge.
                None => (trim_partial_name(attr).to_string(), None),
            };

            if name.is_empty() {
                // Nameless region carries nothing previewable; try the next
                // sibling instead of giving up on the whole buffer.
                search_from = open_idx + 1;
                continue;
            }

            let Some(body_start) = body_start else {
                // The opening tag itself has not finished streaming.
                let call = ScannedCall {
                    name,
                    parameters: Vec::new(),
                    complete: false,
                    fallback_text: None,
                };
                return Some((call, open_idx + 1));
            };

            return Some(self.scan_body(buffer, hits, open_idx, body_start, name));
        }
    }

    fn scan_body(
        &self,
        buffer: &str,
        hits: &[Hit],
        open_idx: usize,
        body_start: usize,
        name: String,
    ) -> (ScannedCall, usize) {
        // The body ends at this invocation's close marker, at the enclosing
        // block close, or at the open of an (unseparated) sibling invocation.
        let mut body_end = buffer.len();
        let mut complete = false;
        let mut resume = hits.len();
        for (j, hit) in hits.iter().enumerate().skip(open_idx + 1) {
            if hit.start < body_start {
                continue;
            }
            match hit.kind {
                MarkerKind::InvokeClose => {
                    body_end = hit.start;
                    complete = true;
                    resume = j + 1;
                    break;
                }
                MarkerKind::BlockClose | MarkerKind::InvokeOpen => {
                    body_end = hit.start;
                    resume = j;
                    break;
                }
                _ => {}
            }
        }

        let mut parameters = self.scan_parameters(buffer, hits, open_idx, body_start, body_end);

        let fallback_text = Some(strip_markup(&buffer[body_start..body_end]))
            .filter(|text| !text.is_empty());
        if parameters.is_empty() {
            if let Some(text) = &fallback_text {
                parameters.push(Parameter::new(SYNTHETIC_PARAMETER, text.clone(), complete));
            }
        }

        let call = ScannedCall {
            name,
            parameters,
            complete,
            fallback_text,
        };
        (call, resume)
    }

    fn scan_parameters(
        &self,
        buffer: &str,
        hits: &[Hit],
        open_idx: usize,
        body_start: usize,
        body_end: usize,
    ) -> Vec<Parameter> {
        let mut parameters = Vec::new();

        let mut k = open_idx + 1;
        while k < hits.len() && hits[k].start < body_start {
            k += 1;
        }

        while k < hits.len() && hits[k].start < body_end {
            if hits[k].kind != MarkerKind::ParameterOpen {
                k += 1;
                continue;
            }
            let open = hits[k];
            let bound = hits
                .get(k + 1)
                .map(|h| h.start.min(body_end))
                .unwrap_or(body_end);

            // Attribute still streaming: nothing more can be recovered yet.
            let Some(q) = buffer[open.end..bound].find('"') else {
                break;
            };
            let param_name = buffer[open.end..open.end + q].to_string();
            let after_quote = open.end + q + 1;
            let Some(g) = buffer[after_quote..bound].find('>') else {
                break;
            };
            let value_start = (after_quote + g + 1).min(body_end);

            // The value ends at this parameter's close marker, or at the next
            // parameter open when the close never arrived (reordered or
            // dropped markers), or runs open-ended to the body edge.
            let mut value_end = body_end;
            let mut param_complete = false;
            let mut next_k = hits.len();
            for (m, hit) in hits.iter().enumerate().skip(k + 1) {
                if hit.start < value_start {
                    continue;
                }
                if hit.start >= body_end {
                    break;
                }
                match hit.kind {
                    MarkerKind::ParameterClose => {
                        value_end = hit.start;
                        param_complete = true;
                        next_k = m + 1;
                        break;
                    }
                    MarkerKind::ParameterOpen => {
                        value_end = hit.start;
                        next_k = m;
                        break;
                    }
                    _ => {}
                }
            }

            let mut value = &buffer[value_start..value_end];
            if !param_complete && value_end == buffer.len() {
                // An open-ended value must never surface the first bytes of
                // its own close marker: earlier emissions have to remain a
                // literal prefix of later ones.
                value = trim_partial_marker_suffix(value);
            }
            parameters.push(Parameter::new(param_name, value, param_complete));

            if next_k == hits.len() && !param_complete {
                break;
            }
            k = next_k;
        }

        parameters
    }
}

impl Default for Scanner {
    fn default() -> Self {
        Self::new()
    }
}

/// Cut off a trailing run that is a proper prefix of a recognized marker.
fn trim_partial_marker_suffix(value: &str) -> &str {
    if let Some(pos) = value.rfind('<') {
        let tail = &value[pos..];
        if MARKERS
            .iter()
            .any(|marker| marker.len() > tail.len() && marker.starts_with(tail))
        {
            return &value[..pos];
        }
    }
    value
}

fn trim_partial_name(attr: &str) -> &str {
    match attr.find('<') {
        Some(pos) => &attr[..pos],
        None => attr,
    }
}

/// Remove every tag-shaped run (`<...>`, plus an unterminated `<...` tail)
/// and trim the result. Used for the synthetic-parameter fallback.
fn strip_markup(interior: &str) -> String {
    let mut out = String::new();
    let mut rest = interior;
    while let Some(pos) = rest.find('<') {
        out.push_str(&rest[..pos]);
        match rest[pos..].find('>') {
            Some(close) => rest = &rest[pos + close + 1..],
            None => {
                rest = "";
            }
        }
    }
    out.push_str(rest);
    out.trim().to_string()
}
