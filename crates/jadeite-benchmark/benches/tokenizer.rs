use codspeed_criterion_compat::{
    Criterion, Throughput, black_box, criterion_group, criterion_main,
};

static PAGE: &str = r#"// layout.jade
doctype 5
html(lang="en")
  head
    title Benchmarks
    script(type='text/javascript', src="/app.js")
      | if (ready) {
      |    start()
      | }
  body
    #container.wide.dark
      h1.title#top Jade - node template engine
      ul.menu
        li.item
          a(href="/") Home
        li.item
          a(href="/about", title="About us") About
      p(data-x=1,data-y=2) Lorem ipsum dolor sit amet, consectetur adipiscing elit.
"#;

static TEXT_LINES: &str = "p
  | It was the year when they finally immanentized the Eschaton
  | It was the year when they finally immanentized the Eschaton
  | It was the year when they finally immanentized the Eschaton
  | It was the year when they finally immanentized the Eschaton
  | It was the year when they finally immanentized the Eschaton
  | It was the year when they finally immanentized the Eschaton
  | It was the year when they finally immanentized the Eschaton
  | It was the year when they finally immanentized the Eschaton
";

static CANDIDATES: [(&str, &str); 2] = [("page", PAGE), ("text_lines", TEXT_LINES)];

fn iterate(s: &str) {
    for token in jadeite_tokenizer::lex("bench", s, "", "") {
        black_box(token);
    }
}

fn bench_iterate(c: &mut Criterion) {
    let mut group = c.benchmark_group("iterate");

    for (name, source) in CANDIDATES {
        group.throughput(Throughput::Bytes(source.len() as u64));
        group.bench_with_input(name, &source, |b, &s| b.iter(|| iterate(s)));
    }
}

criterion_group!(benches, bench_iterate);
criterion_main!(benches);
