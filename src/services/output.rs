use crate::domain::models::JsonOut;
use serde::Serialize;
use std::io::Read;

/// Writes `data` inside the `{ ok, data }` envelope, or as text via `text`.
pub fn print_envelope<T: Serialize>(
    json: bool,
    ok: bool,
    data: &T,
    text: impl FnOnce(&T) -> String,
) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(&JsonOut { ok, data })?);
    } else {
        let rendered = text(data);
        if !rendered.is_empty() {
            println!("{}", rendered);
        }
    }
    Ok(())
}

/// One text row per element.
pub fn print_out<T: Serialize>(
    json: bool,
    data: &[T],
    row: impl Fn(&T) -> String,
) -> anyhow::Result<()> {
    print_envelope(json, true, &data, |rows| {
        rows.iter().map(&row).collect::<Vec<_>>().join("\n")
    })
}

pub fn print_one<T: Serialize>(
    json: bool,
    data: T,
    row: impl Fn(&T) -> String,
) -> anyhow::Result<()> {
    print_envelope(json, true, &data, |d| row(d))
}

/// File contents, or stdin when `input` is `-`.
pub fn read_input(input: &str) -> anyhow::Result<String> {
    if input == "-" {
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf)?;
        return Ok(buf);
    }
    std::fs::read_to_string(input)
        .map_err(|e| anyhow::anyhow!("failed to read input {}: {}", input, e))
}
