//! The starter project shown on first launch and after a reset.

use livepen_types::SourceBundle;
use once_cell::sync::Lazy;

const STARTER_MARKUP: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>My Page</title>
</head>
<body>
    <header>
        <h1>Hello, world!</h1>
        <p>Welcome to livepen</p>
    </header>

    <main>
        <section>
            <h2>Features</h2>
            <ul>
                <li>Small and fast editor</li>
                <li>Live preview</li>
                <li>No backend required</li>
            </ul>
        </section>

        <button onclick="showAlert()">Click here</button>
    </main>

    <footer>
        <p>Made with livepen</p>
    </footer>
</body>
</html>"#;

const STARTER_STYLE: &str = r#"* {
    margin: 0;
    padding: 0;
    box-sizing: border-box;
}

body {
    font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif;
    line-height: 1.6;
    color: #333;
    background-color: #f5f5f5;
    padding: 20px;
    max-width: 1200px;
    margin: 0 auto;
}

header {
    background: linear-gradient(135deg, #4361ee, #3a0ca3);
    color: white;
    padding: 2rem;
    border-radius: 10px;
    margin-bottom: 2rem;
    text-align: center;
}

button {
    background: #4361ee;
    color: white;
    border: none;
    padding: 12px 24px;
    border-radius: 5px;
    cursor: pointer;
}"#;

const STARTER_SCRIPT: &str = r#"function showAlert() {
    alert('Hello from livepen!');
    console.log('Button clicked');
}

document.addEventListener('DOMContentLoaded', function () {
    console.log('Page loaded');
});"#;

static STARTER: Lazy<SourceBundle> =
    Lazy::new(|| SourceBundle::new(STARTER_MARKUP, STARTER_STYLE, STARTER_SCRIPT));

/// A fresh copy of the starter project.
pub fn starter_bundle() -> SourceBundle {
    STARTER.clone()
}
