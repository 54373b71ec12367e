use std::process::Command;

fn main() {
    // Only rebuild CSS when template or CSS files change
    println!("cargo:rerun-if-changed=assets/css/input.css");
    println!("cargo:rerun-if-changed=templates/");

    // Try to run Tailwind CSS standalone CLI
    let status = Command::new("tailwindcss")
        .args([
            "-i",
            "assets/css/input.css",
            "-o",
            "assets/css/output.css",
            "--minify",
        ])
        .status();

    match status {
        Ok(s) if s.success() => {
            println!("cargo:warning=Tailwind CSS compiled successfully");
        }
        _ => {
            // Tailwind CLI not available — fall back to the hand-rolled sheet
            println!("cargo:warning=Tailwind CLI not found, using fallback CSS");
            let fallback = r#"*, *::before, *::after { box-sizing: border-box; margin: 0; padding: 0; }
body { font-family: system-ui, -apple-system, sans-serif; line-height: 1.6; color: #1c1917; background: #fafaf9; -webkit-font-smoothing: antialiased; }
.container { max-width: 72rem; margin: 0 auto; padding: 0 1rem; }
.site-header { background: #fff; border-bottom: 1px solid #e7e5e4; }
.header-row { display: flex; align-items: center; justify-content: space-between; padding: 0.75rem 1rem; }
.brand { font-size: 1.25rem; font-weight: 700; }
.nav { display: flex; align-items: center; gap: 1rem; }
.nav-user { font-weight: 600; }
a { color: inherit; text-decoration: none; }
a:hover { opacity: 0.8; }
main { padding: 1.5rem 1rem; }
h1 { font-size: 1.5rem; font-weight: 600; margin-bottom: 1rem; }
.page-head { display: flex; flex-wrap: wrap; align-items: center; justify-content: space-between; gap: 0.75rem; }
.view-toggle { display: flex; gap: 0.5rem; }
.filter { margin: 1rem 0; }
select, input, textarea { font: inherit; padding: 0.5rem 0.75rem; border: 1px solid #d6d3d1; border-radius: 0.5rem; background: #fff; width: 100%; }
.filter select { width: auto; }
.grid { display: grid; gap: 1rem; grid-template-columns: repeat(auto-fill, minmax(15rem, 1fr)); margin-top: 1rem; }
.card { background: #fff; border-radius: 0.75rem; border: 1px solid #e7e5e4; overflow: hidden; box-shadow: 0 1px 2px 0 rgb(0 0 0 / 0.05); }
.card-image { display: block; position: relative; background: #f5f5f4; }
.card-image img { display: block; width: 100%; height: 11rem; object-fit: cover; }
.no-image { display: flex; align-items: center; justify-content: center; height: 11rem; color: #78716c; }
.card-body { display: flex; flex-direction: column; gap: 0.25rem; padding: 1rem; }
.card-title { font-size: 1rem; font-weight: 600; }
.card-actions { display: flex; gap: 0.5rem; margin-top: 0.75rem; }
.price { font-size: 1.125rem; font-weight: 700; }
.price-lg { font-size: 1.5rem; margin: 0.75rem 0 0.25rem; }
.badge { position: absolute; left: 0.75rem; top: 0.75rem; border-radius: 9999px; padding: 0.25rem 0.5rem; font-size: 0.75rem; font-weight: 500; }
.badge-sold { background: #fef3c7; color: #92400e; }
.muted { color: #78716c; font-size: 0.875rem; }
.detail { display: grid; gap: 1.5rem; grid-template-columns: 1fr; }
@media (min-width: 48rem) { .detail { grid-template-columns: 1fr 1fr; } }
.detail-image img { display: block; width: 100%; height: 22rem; object-fit: cover; }
.detail-image .no-image { height: 22rem; }
.detail-body { padding: 1.5rem; }
.detail-head { display: flex; align-items: flex-start; justify-content: space-between; gap: 1rem; }
.detail-head .badge { position: static; }
.detail-actions { display: flex; gap: 0.5rem; margin-top: 1.5rem; }
.description { margin-top: 1rem; white-space: pre-wrap; }
.seller-heading { font-size: 1rem; font-weight: 600; margin-top: 1.5rem; }
.contact { list-style: none; color: #44403c; }
.form-page { max-width: 40rem; margin: 0 auto; padding: 1.5rem; }
.form-narrow { max-width: 28rem; }
.stack { display: flex; flex-direction: column; gap: 0.5rem; margin-top: 1rem; }
.stack label { font-size: 0.875rem; font-weight: 500; margin-top: 0.5rem; }
.check { display: flex; align-items: center; gap: 0.5rem; }
.check input { width: auto; }
.hint { color: #78716c; font-size: 0.75rem; }
.error { color: #dc2626; }
.btn { display: inline-flex; align-items: center; justify-content: center; padding: 0.5rem 1rem; border-radius: 0.5rem; font-size: 0.875rem; font-weight: 500; transition: all 0.15s; cursor: pointer; text-decoration: none; border: none; }
.btn:disabled { opacity: 0.6; cursor: default; }
.btn-primary { background: #1c1917; color: #fff; }
.btn-primary:hover { background: #44403c; }
.btn-secondary { background: #fff; color: #1c1917; border: 1px solid #d6d3d1; }
.btn-secondary:hover { background: #f5f5f4; }
.btn-warn { background: #f59e0b; color: #fff; }
.btn-danger { background: #dc2626; color: #fff; }
.sr-only { position: absolute; width: 1px; height: 1px; padding: 0; margin: -1px; overflow: hidden; clip: rect(0, 0, 0, 0); border: 0; }
"#;
            std::fs::create_dir_all("assets/css").ok();
            std::fs::write("assets/css/output.css", fallback).ok();
        }
    }
}
