//! Renders a small scene headlessly and picks a few cursor positions,
//! once through each strategy.
//!
//! Run with `cargo run --example pick_demo`. Writes `pick_demo.png` and
//! `pick_demo_buffer.png` next to the working directory so the canvas and
//! the encoded pick buffer can be inspected side by side.

use std::cell::RefCell;
use std::rc::Rc;

use framepick::*;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut engine = init_engine(512, 512, &PickOptions::default())?;

    let mut scene = Scene::new();
    let root = scene.add_root("demo");
    let colors = [
        Vec4::new(0.85, 0.3, 0.25, 1.0),
        Vec4::new(0.3, 0.7, 0.35, 1.0),
        Vec4::new(0.25, 0.45, 0.85, 1.0),
    ];
    for (i, x) in [-1.2f32, 0.0, 1.2].into_iter().enumerate() {
        let node = scene.add_child(root, format!("cube-{i}"));
        scene.set_mesh(node, MeshData::cube(0.45));
        scene.set_transform(node, Mat4::from_translation(Vec3::new(x, 0.0, 0.0)));
        scene.set_base_color(node, colors[i]);
    }

    if let Some((min, max)) = scene.bounding_box() {
        engine.camera.look_at_box(min, max);
    }

    engine.capture_canvas(&mut scene, "pick_demo.png")?;

    // Synchronous strategy: ask directly.
    let mut picker = GpuPicker::new();
    for cursor in [(256.0, 256.0), (90.0, 256.0), (420.0, 256.0), (10.0, 10.0)] {
        let label = match picker.pick(&mut engine, &mut scene, cursor.0, cursor.1)? {
            Some(node) => scene.node(node).name.clone(),
            None => "background".to_string(),
        };
        println!("sync pick at {cursor:?} -> {label}");
    }

    // Deferred strategy: arm the pass, resolve on the next frame.
    let mut pass: ColorPickPass<NodeId> = ColorPickPass::new();
    let resolved: Rc<RefCell<Option<Option<NodeId>>>> = Rc::new(RefCell::new(None));
    let sink = Rc::clone(&resolved);
    pass.request_pick(256.0, 256.0, move |hit| *sink.borrow_mut() = Some(hit));
    engine.render_frame(&mut scene, &mut pass)?;

    if let Some(hit) = resolved.borrow().as_ref() {
        let label = hit.map_or("background".to_string(), |n| scene.node(n).name.clone());
        println!("deferred pick at (256, 256) -> {label}");
    }

    engine.capture_pick_buffer("pick_demo_buffer.png")?;
    Ok(())
}
