use moon::*;

/// Transform library the frontend calls through `Babel.transform`.
const BABEL_STANDALONE_URL: &str = "https://unpkg.com/@babel/standalone/babel.min.js";

async fn frontend() -> Frontend {
    Frontend::new()
        .title("JSX/TSX Live Editor")
        .append_to_head(format!(r#"<script src="{BABEL_STANDALONE_URL}"></script>"#))
}

async fn up_msg_handler(_: UpMsgRequest<()>) {}

#[moon::main]
async fn main() -> std::io::Result<()> {
    start(frontend, up_msg_handler, |_| {}).await
}
