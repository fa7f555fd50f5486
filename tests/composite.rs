use belleza::{Canvas, FrameIndex, Layer, LayerStack, Raster, composite_frame};

fn canvas() -> Canvas {
    Canvas::new(16, 16, [255, 255, 255, 255])
}

fn solid_layer(name: &str, rgba: [u8; 4], frames: &[u64]) -> Layer {
    let mut layer = Layer::new(name);
    for &f in frames {
        layer
            .frames
            .insert(FrameIndex(f), Raster::filled(16, 16, rgba));
    }
    layer
}

const RED: [u8; 4] = [255, 0, 0, 255];
const BLUE: [u8; 4] = [0, 0, 255, 255];

#[test]
fn top_layer_occludes_bottom_layer() {
    let mut stack = LayerStack::new();
    stack.add_layer(solid_layer("a", RED, &[0]));
    stack.add_layer(solid_layer("b", BLUE, &[0]));

    let out = composite_frame(&stack, FrameIndex(0), &canvas()).unwrap();
    assert_eq!(out.pixel(8, 8), BLUE);
}

#[test]
fn reordering_layers_reorders_every_subsequent_composite() {
    // The regression this engine exists for: a reorder must be visible to
    // every later composite, export included, with no extra state transfer.
    let mut stack = LayerStack::new();
    stack.add_layer(solid_layer("a", RED, &[0]));
    stack.add_layer(solid_layer("b", BLUE, &[0]));

    let before = composite_frame(&stack, FrameIndex(0), &canvas()).unwrap();
    assert_eq!(before.pixel(8, 8), BLUE);

    // Move A above B.
    assert!(stack.move_up(0));
    let after = composite_frame(&stack, FrameIndex(0), &canvas()).unwrap();
    assert_eq!(after.pixel(8, 8), RED);

    // And back below again.
    assert!(stack.move_down(1));
    let again = composite_frame(&stack, FrameIndex(0), &canvas()).unwrap();
    assert_eq!(again.pixel(8, 8), BLUE);
}

#[test]
fn swapping_overlapping_layers_changes_the_output() {
    let mut stack = LayerStack::new();
    stack.add_layer(solid_layer("a", RED, &[0]));
    stack.add_layer(solid_layer("b", BLUE, &[0]));

    let before = composite_frame(&stack, FrameIndex(0), &canvas()).unwrap();
    stack.move_down(1);
    let after = composite_frame(&stack, FrameIndex(0), &canvas()).unwrap();
    assert_ne!(before, after);
}

#[test]
fn invisible_layer_contributes_no_pixels() {
    let mut stack = LayerStack::new();
    let mut layer = solid_layer("hidden", RED, &[0]);
    layer.visible = false;
    stack.add_layer(layer);

    let out = composite_frame(&stack, FrameIndex(0), &canvas()).unwrap();
    assert_eq!(out.pixel(8, 8), [255, 255, 255, 255]);
}

#[test]
fn opacity_zero_matches_invisible_exactly() {
    let mut with_zero_opacity = LayerStack::new();
    let mut layer = solid_layer("ink", RED, &[0]);
    layer.set_opacity(0);
    with_zero_opacity.add_layer(layer);

    let mut with_hidden = LayerStack::new();
    let mut layer = solid_layer("ink", RED, &[0]);
    layer.visible = false;
    with_hidden.add_layer(layer);

    let a = composite_frame(&with_zero_opacity, FrameIndex(0), &canvas()).unwrap();
    let b = composite_frame(&with_hidden, FrameIndex(0), &canvas()).unwrap();
    assert_eq!(a, b);
}

#[test]
fn layer_without_frame_at_index_is_transparent_there() {
    let mut stack = LayerStack::new();
    stack.add_layer(solid_layer("sparse", RED, &[0, 2]));

    let at_1 = composite_frame(&stack, FrameIndex(1), &canvas()).unwrap();
    assert_eq!(at_1.pixel(8, 8), [255, 255, 255, 255]);

    let at_2 = composite_frame(&stack, FrameIndex(2), &canvas()).unwrap();
    assert_eq!(at_2.pixel(8, 8), RED);
}

#[test]
fn present_blank_frame_composites_like_an_absent_one() {
    // Absence and a present-but-blank raster are distinct states in the
    // store; the flattened result must nevertheless agree.
    let mut with_blank = LayerStack::new();
    let mut layer = Layer::new("blank");
    layer.frames.insert(FrameIndex(0), Raster::new(16, 16));
    with_blank.add_layer(layer);

    let mut without = LayerStack::new();
    without.add_layer(Layer::new("nothing"));

    let a = composite_frame(&with_blank, FrameIndex(0), &canvas()).unwrap();
    let b = composite_frame(&without, FrameIndex(0), &canvas()).unwrap();
    assert_eq!(a, b);
}

#[test]
fn partial_alpha_stacks_blend_in_order() {
    // 50%-alpha blue over opaque red over white: result leans blue-red,
    // and the reverse order gives a different mix.
    let translucent_blue = [0, 0, 255, 128];
    let mut stack = LayerStack::new();
    stack.add_layer(solid_layer("red", RED, &[0]));
    stack.add_layer(solid_layer("blue", translucent_blue, &[0]));

    let out = composite_frame(&stack, FrameIndex(0), &canvas()).unwrap();
    let px = out.pixel(8, 8);
    assert_eq!(px[3], 255);
    assert!(px[2] > 100, "blue should dominate on top: {px:?}");
    assert!(px[0] > 100, "red shows through: {px:?}");

    stack.move_down(1);
    let swapped = composite_frame(&stack, FrameIndex(0), &canvas()).unwrap();
    // Opaque red on top fully hides the translucent blue below.
    assert_eq!(swapped.pixel(8, 8), RED);
}
