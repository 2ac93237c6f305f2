#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Ping,
    Parse,
    Import,
    Render,
    Serialize,
    Download,
    DetectEncoding,
    RunQa,
    Merge,
    Unknown,
}

impl From<&str> for Command {
    fn from(s: &str) -> Self {
        match s {
            "ping" => Command::Ping,
            "wts.parse" => Command::Parse,
            "wts.import" => Command::Import,
            "wts.render" => Command::Render,
            "wts.serialize" => Command::Serialize,
            "wts.download" => Command::Download,
            "encoding.detect" | "detect_encoding" => Command::DetectEncoding,
            "run_qa" => Command::RunQa,
            "wts.merge" => Command::Merge,
            _ => Command::Unknown,
        }
    }
}
