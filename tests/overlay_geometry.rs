use frame_overlay::overlay::{ENTRY_SPACING, LINE_WIDTH};
use frame_overlay::{
    overlays_for, BoundingBox, ClassLabel, EvaluationResult, OverlayRenderer, OverlayStyle,
    Palette, RecordingSurface, Rectangle,
};

fn one_box(class_id: i32) -> EvaluationResult {
    EvaluationResult::BoundingBoxes(vec![BoundingBox {
        rectangle: Rectangle {
            x: 0.25,
            y: 0.25,
            width: 0.5,
            height: 0.5,
        },
        class_label: ClassLabel::new(class_id, "person"),
    }])
}

#[test]
fn centred_box_strokes_inset_rect() {
    let mut renderer = OverlayRenderer::new();
    renderer.replace(overlays_for(&one_box(0), &OverlayStyle::default()).unwrap());

    let mut surface = RecordingSurface::new(100, 100);
    assert_eq!(renderer.redraw(&mut surface), 1);

    let strokes = surface.strokes();
    assert_eq!(strokes.len(), 1);
    let (rect, color, line_width) = strokes[0];
    assert_eq!((rect.x, rect.y), (25.0, 25.0));
    assert_eq!((rect.width, rect.height), (50.0 - LINE_WIDTH, 50.0 - LINE_WIDTH));
    assert_eq!(line_width, LINE_WIDTH);
    assert_eq!(color, Palette.color_for(0));
    assert_eq!(surface.texts(), vec!["person"]);
}

#[test]
fn class_colour_is_stable_across_results() {
    let style = OverlayStyle::default();
    let mut first = RecordingSurface::new(100, 100);
    let mut second = RecordingSurface::new(100, 100);
    let mut renderer = OverlayRenderer::new();

    renderer.replace(overlays_for(&one_box(27), &style).unwrap());
    renderer.redraw(&mut first);
    renderer.replace(overlays_for(&one_box(27), &style).unwrap());
    renderer.redraw(&mut second);

    assert_eq!(first.strokes()[0].1, second.strokes()[0].1);
    assert_eq!(first.strokes()[0].1, Palette.color_for(27 % 20));
}

#[test]
fn labels_stack_in_input_order() {
    let result = EvaluationResult::ClassLabels(vec![
        ClassLabel::new(2, "tabby"),
        ClassLabel::new(0, "tiger"),
        ClassLabel::new(9, "lynx"),
    ]);
    let mut renderer = OverlayRenderer::new();
    renderer.replace(overlays_for(&result, &OverlayStyle::default()).unwrap());

    let mut surface = RecordingSurface::new(320, 240);
    renderer.redraw(&mut surface);
    assert_eq!(surface.texts(), vec!["tabby", "tiger", "lynx"]);

    let ys: Vec<f32> = renderer
        .overlays()
        .iter()
        .map(|overlay| match overlay {
            frame_overlay::Overlay::Text(text) => text.y,
            other => panic!("unexpected overlay {other:?}"),
        })
        .collect();
    assert_eq!(ys, vec![ENTRY_SPACING, 2.0 * ENTRY_SPACING, 3.0 * ENTRY_SPACING]);
}
