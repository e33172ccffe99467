use anyhow::Result;
use glam::Mat4;
use rune_animation::{
    interpolate_values, AnimationConfig, EasingFunction, ElementAnimation, ElementAnimationOrigin,
    ElementBox, IterationCount, NumericValue, PrimitiveKind, Property, PropertyValue, Transform,
    TransformPrimitive, Unit,
};

fn transform_animation(start: Transform) -> ElementAnimation {
    ElementAnimation::new(
        "transform",
        ElementAnimationOrigin::Animation,
        &Property::transform(start),
        0.0,
        1.0,
        IterationCount::Count(1),
        false,
    )
}

fn key_transform(animation: &ElementAnimation, index: usize) -> &Transform {
    animation.keys()[index]
        .value
        .as_transform()
        .expect("transform key")
}

fn matrix_of(value: &PropertyValue, element: &ElementBox) -> Result<Mat4> {
    let transform = value.as_transform().expect("transform value");
    Ok(transform.to_matrix(element)?)
}

#[test]
fn incompatible_orders_fall_back_to_decomposition() -> Result<()> {
    let element = ElementBox::new(120.0, 80.0);
    let first = Transform::new()
        .with(TransformPrimitive::rotate(NumericValue::deg(30.0)))
        .with(TransformPrimitive::scale(2.0, 1.0));
    let second = Transform::new()
        .with(TransformPrimitive::scale(1.5, 1.5))
        .with(TransformPrimitive::rotate(NumericValue::deg(60.0)));
    let m0 = first.to_matrix(&element)?;
    let m1 = second.to_matrix(&element)?;

    let mut animation = transform_animation(first);
    animation.add_key(1.0, &Property::transform(second), &element, EasingFunction::Linear, false)?;

    assert_eq!(key_transform(&animation, 0).kinds(), vec![PrimitiveKind::Decomposed]);
    assert_eq!(key_transform(&animation, 1).kinds(), vec![PrimitiveKind::Decomposed]);

    let config = AnimationConfig::default();
    let v0 = &animation.keys()[0].value;
    let v1 = &animation.keys()[1].value;
    assert!(matrix_of(&interpolate_values(v0, v1, 0.0, &config), &element)?.abs_diff_eq(m0, 1e-4));
    assert!(matrix_of(&interpolate_values(v0, v1, 1.0, &config), &element)?.abs_diff_eq(m1, 1e-4));
    Ok(())
}

#[test]
fn perspective_endpoints_survive_decomposition() -> Result<()> {
    let element = ElementBox::new(200.0, 200.0);
    let first = Transform::new()
        .with(TransformPrimitive::perspective(NumericValue::px(500.0)))
        .with(TransformPrimitive::TranslateZ { z: NumericValue::px(20.0) })
        .with(TransformPrimitive::scale(2.0, 2.0));
    let second = Transform::new().with(TransformPrimitive::rotate(NumericValue::deg(30.0)));
    let m0 = first.to_matrix(&element)?;
    let m1 = second.to_matrix(&element)?;
    assert!((m0.w_axis.w - 0.96).abs() < 1e-5);

    let mut animation = transform_animation(first);
    animation.add_key(1.0, &Property::transform(second), &element, EasingFunction::Linear, false)?;
    assert_eq!(key_transform(&animation, 0).kinds(), vec![PrimitiveKind::Decomposed]);

    let config = AnimationConfig::default();
    let v0 = &animation.keys()[0].value;
    let v1 = &animation.keys()[1].value;
    assert!(matrix_of(&interpolate_values(v0, v1, 0.0, &config), &element)?.abs_diff_eq(m0, 1e-4));
    assert!(matrix_of(&interpolate_values(v0, v1, 1.0, &config), &element)?.abs_diff_eq(m1, 1e-4));

    let end = animation.update_and_get_property(1.0).expect("value at the end");
    assert!(matrix_of(&end.value, &element)?.abs_diff_eq(m1, 1e-4));
    Ok(())
}

#[test]
fn later_keys_reshape_earlier_ones() -> Result<()> {
    let element = ElementBox::new(100.0, 100.0);
    let mut animation = transform_animation(
        Transform::new().with(TransformPrimitive::ScaleX { x: 1.0 }),
    );
    animation.add_key(
        0.5,
        &Property::transform(Transform::new().with(TransformPrimitive::ScaleX { x: 2.0 })),
        &element,
        EasingFunction::Linear,
        false,
    )?;
    animation.add_key(
        1.0,
        &Property::transform(
            Transform::new()
                .with(TransformPrimitive::Scale3D { x: 1.0, y: 2.0, z: 1.0 })
                .with(TransformPrimitive::rotate(NumericValue::deg(90.0))),
        ),
        &element,
        EasingFunction::Linear,
        false,
    )?;

    for index in 0..3 {
        assert_eq!(
            key_transform(&animation, index).kinds(),
            vec![PrimitiveKind::Scale3D, PrimitiveKind::Rotate2D],
            "key {index}"
        );
    }

    let value = animation.update_and_get_property(0.25).expect("value at 0.25");
    let expected = Transform::new()
        .with(TransformPrimitive::Scale3D { x: 1.5, y: 1.0, z: 1.0 })
        .with(TransformPrimitive::rotate(NumericValue::rad(0.0)));
    assert_eq!(value.value.as_transform(), Some(&expected));
    assert_eq!(value.unit, Unit::Transform);
    Ok(())
}

#[test]
fn relative_units_are_resolved_on_every_key() -> Result<()> {
    let element = ElementBox::new(300.0, 50.0).with_font_size(10.0);
    let mut animation = transform_animation(Transform::new().with(TransformPrimitive::translate(
        NumericValue::percent(10.0),
        NumericValue::new(2.0, Unit::Em),
    )));
    animation.add_key(
        1.0,
        &Property::transform(Transform::new().with(TransformPrimitive::translate(
            NumericValue::px(0.0),
            NumericValue::percent(100.0),
        ))),
        &element,
        EasingFunction::Linear,
        false,
    )?;

    assert_eq!(
        key_transform(&animation, 0).primitives,
        vec![TransformPrimitive::translate(NumericValue::px(30.0), NumericValue::px(20.0))]
    );
    assert_eq!(
        key_transform(&animation, 1).primitives,
        vec![TransformPrimitive::translate(NumericValue::px(0.0), NumericValue::px(50.0))]
    );
    Ok(())
}

#[test]
fn unresolvable_unit_rejects_key() {
    let element = ElementBox::default();
    let start = Transform::new().with(TransformPrimitive::TranslateZ { z: NumericValue::px(0.0) });
    let mut animation = transform_animation(start.clone());

    let result = animation.add_key(
        1.0,
        &Property::transform(
            Transform::new().with(TransformPrimitive::TranslateZ { z: NumericValue::percent(50.0) }),
        ),
        &element,
        EasingFunction::Linear,
        false,
    );

    assert!(result.is_err());
    assert_eq!(animation.keys().len(), 1);
    assert_eq!(key_transform(&animation, 0), &start);
}
