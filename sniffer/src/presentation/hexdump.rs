/// Payload octets shown per packet.
pub const LIMIT: usize = 64;
const BYTES_PER_LINE: usize = 16;
const HEX_WIDTH: usize = BYTES_PER_LINE * 3;

/// `0000: 47 45 54 ...  GET` lines for the first [`LIMIT`] octets of `data`.
pub fn render(data: &[u8]) -> String {
    let data = &data[..data.len().min(LIMIT)];

    data.chunks(BYTES_PER_LINE)
        .enumerate()
        .map(|(index, chunk)| {
            let hex = chunk
                .iter()
                .map(|byte| format!("{:02x}", byte))
                .collect::<Vec<String>>()
                .join(" ");
            let ascii: String = chunk.iter().map(|byte| printable(*byte)).collect();

            format!("{:04x}: {:<HEX_WIDTH$} {}", index * BYTES_PER_LINE, hex, ascii)
        })
        .collect::<Vec<String>>()
        .join("\n")
}

fn printable(byte: u8) -> char {
    match byte {
        32..=126 => byte as char,
        _ => '.',
    }
}
