pub(super) fn build_transcription_multipart(
    boundary: &str,
    model: &str,
    wav: &[u8],
    language: Option<&str>,
) -> Vec<u8> {
    let mut body = Vec::with_capacity(wav.len() + 512);

    append_field(&mut body, boundary, "model", model);
    append_field(&mut body, boundary, "response_format", "json");
    if let Some(lang) = language {
        append_field(&mut body, boundary, "language", lang);
    }

    body.extend_from_slice(format!("--{boundary}\r\n").as_bytes());
    body.extend_from_slice(
        b"Content-Disposition: form-data; name=\"file\"; filename=\"audio.wav\"\r\n",
    );
    body.extend_from_slice(b"Content-Type: audio/wav\r\n\r\n");
    body.extend_from_slice(wav);
    body.extend_from_slice(b"\r\n");
    body.extend_from_slice(format!("--{boundary}--\r\n").as_bytes());

    body
}

fn append_field(body: &mut Vec<u8>, boundary: &str, name: &str, value: &str) {
    body.extend_from_slice(format!("--{boundary}\r\n").as_bytes());
    body.extend_from_slice(
        format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n").as_bytes(),
    );
    body.extend_from_slice(value.as_bytes());
    body.extend_from_slice(b"\r\n");
}

/// Whisper takes ISO-639-1 codes; reduce a BCP-47 tag like `en-US` to `en`.
pub(super) fn whisper_language(tag: &str) -> Option<&str> {
    let primary = tag.split(['-', '_']).next().unwrap_or_default().trim();
    if primary.is_empty() {
        return None;
    }
    Some(primary)
}
