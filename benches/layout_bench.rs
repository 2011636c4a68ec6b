use chart_overlays::core::{Rect, Unit, Viewport};
use chart_overlays::layout::{Bar, BoxSpec, Component, Edges, Flex, Text};
use chart_overlays::objects::{Alert, ChartPoint, ChartView, ObjectRegistry, PriceNote, PriceRange};
use chart_overlays::render::{Font, RenderFrame};
use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;

fn label_tree(rows: usize) -> Flex {
    let font = Font::default();
    let mut root = Flex::column()
        .with_gap(2.0)
        .with_box(BoxSpec::default().with_padding(Edges::all(4.0)));
    for row in 0..rows {
        root = root.with_child(
            Flex::row()
                .with_gap(4.0)
                .with_child(Text::new(format!("row {row}"), font.clone()))
                .with_child(Bar::new(row as f64, rows as f64).with_box(
                    BoxSpec::default()
                        .with_width(40.0, Unit::Percent)
                        .with_height(6.0, Unit::Pixel),
                )),
        );
    }
    root
}

fn bench_flex_measure_and_render(c: &mut Criterion) {
    let tree = label_tree(50);

    c.bench_function("flex_measure_50_rows", |b| {
        b.iter(|| {
            let width = tree.outer_width(black_box(640.0));
            let height = tree.outer_height(black_box(480.0));
            black_box((width, height))
        })
    });

    c.bench_function("flex_render_50_rows", |b| {
        let mut frame = RenderFrame::new(Viewport::new(640, 480));
        b.iter(|| {
            frame.clear();
            tree.render(&mut frame, 0.0, 0.0, 640.0, 480.0);
            black_box(frame.rects.len())
        })
    });
}

fn bench_registry_hit_test(c: &mut Criterion) {
    let chart = ChartView::new(Rect::new(0.0, 0.0, 1600.0, 900.0), (0.0, 500.0), (0.0, 1_000.0), 0.25)
        .expect("valid view");
    let mut registry = ObjectRegistry::new();
    for i in 0..200 {
        let bar = f64::from(i) * 2.5;
        let price = 100.0 + f64::from(i) * 4.0;
        registry
            .insert(Box::new(Alert::new(format!("alert-{i}"), price)))
            .expect("unique id");
        registry
            .insert(Box::new(PriceNote::new(
                format!("note-{i}"),
                ChartPoint::new(bar, price),
                "note",
            )))
            .expect("unique id");
        registry
            .insert(Box::new(PriceRange::new(
                format!("range-{i}"),
                ChartPoint::new(bar, price),
                ChartPoint::new(bar + 10.0, price + 20.0),
            )))
            .expect("unique id");
    }

    c.bench_function("registry_prepare_600", |b| {
        b.iter(|| registry.prepare_all(black_box(&chart)))
    });

    registry.prepare_all(&chart);
    c.bench_function("registry_closest_at_600", |b| {
        b.iter(|| black_box(registry.closest_at(black_box(800.0), black_box(450.0)).is_some()))
    });
}

criterion_group!(benches, bench_flex_measure_and_render, bench_registry_hit_test);
criterion_main!(benches);
