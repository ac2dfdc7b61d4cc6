/// A color descriptor as given on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorSpec<'a> {
    /// 16-bit channels parsed from a `#` hex form.
    Rgb { red: u16, green: u16, blue: u16 },
    /// Anything else, looked up in the server's color database.
    Named(&'a str),
}

impl<'a> ColorSpec<'a> {
    /// Hex forms `#rgb`, `#rrggbb` and `#rrrrggggbbbb` are parsed here; any
    /// other `#` string is an error. Strings without `#` are color names.
    pub fn parse(descr: &'a str) -> Option<Self> {
        let Some(hex) = descr.strip_prefix('#') else {
            return (!descr.is_empty()).then_some(ColorSpec::Named(descr));
        };
        if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return None;
        }
        let digits = match hex.len() {
            3 => 1,
            6 => 2,
            12 => 4,
            _ => return None,
        };
        let channel = |i: usize| -> Option<u16> {
            let value = u16::from_str_radix(&hex[i * digits..(i + 1) * digits], 16).ok()?;
            // Replicate the digits so #fff and #ffff... both mean full intensity.
            Some(match digits {
                1 => value * 0x1111,
                2 => value * 0x0101,
                _ => value,
            })
        };
        Some(ColorSpec::Rgb {
            red: channel(0)?,
            green: channel(1)?,
            blue: channel(2)?,
        })
    }
}
