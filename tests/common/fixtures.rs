use livepen::SourceBundle;

/// A full document with both head and body markers.
pub fn full_document() -> SourceBundle {
    SourceBundle::new(
        "<html><head></head><body></body></html>",
        "body{color:red}",
        "console.log(1)",
    )
}

/// A fragment with no structural markers.
pub fn fragment() -> SourceBundle {
    SourceBundle::new("<div>hi</div>", "div{margin:0}", "console.log('hi')")
}

/// A document with an opening body marker but no closing head marker.
pub fn body_only() -> SourceBundle {
    SourceBundle::new(
        "<body class=\"main\"><p>x</p></body>",
        "p{}",
        "run()",
    )
}
