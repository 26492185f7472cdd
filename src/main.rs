use actix_web_csp_nonce::{
    CspConfigBuilder, CspPolicyBuilder, CspRenderHook, DocumentSections, FragmentGroup,
    ParsedFragment, RenderContext, Source,
};

fn main() {
    println!("Actix Web CSP Nonce Example");

    let policy = CspPolicyBuilder::new()
        .default_src([Source::Self_])
        .script_src([Source::Self_, Source::NoncePlaceholder, Source::StrictDynamic])
        .style_src([Source::Self_, Source::NoncePlaceholder])
        .object_src([Source::None])
        .build_unchecked();

    let config = match CspConfigBuilder::new().policy(policy, true).build() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("Invalid configuration: {}", err);
            return;
        }
    };

    let nonce = match config.generate_nonce() {
        Ok(nonce) => nonce,
        Err(err) => {
            eprintln!("Nonce generation failed: {}", err);
            return;
        }
    };

    let document = DocumentSections::new()
        .with(
            FragmentGroup::Head,
            ParsedFragment::parse(r#"<link rel="stylesheet" href="/app.css"><style>body{}</style>"#),
        )
        .with(
            FragmentGroup::Body,
            ParsedFragment::parse(r#"<div id="app"></div><script src="/app.js"></script>"#),
        );
    let mut ctx = RenderContext::new(document).with_nonce(nonce);

    let hook = CspRenderHook::from_config(&config);
    if let Some(value) = hook.on_render_html(&mut ctx, &config.resolve("/"), false) {
        println!("Content-Security-Policy: {}", value.to_str().unwrap_or_default());
    }

    for group in FragmentGroup::ALL {
        for fragment in ctx.document().group(group) {
            if let Ok(html) = fragment.render() {
                println!("[{}] {}", group, html);
            }
        }
    }
}
