use serde::ser::{Error as _, Serialize, Serializer};
use time::Duration;
use time::macros::datetime;

use super::*;
use crate::config::capital_level_encoder;
use crate::entry::{Entry, EntryCaller};
use crate::error::EncodeError;
use crate::field::{Complex128, Complex64};
use crate::level::Level;
use crate::marshal::{
    ArrayEncoder, ArrayMarshalerFn, ObjectEncoder, ObjectMarshalerFn, PrimitiveArrayEncoder,
};
use crate::reflect::Reflected;

const L: &str = INDENT_LEADER;

fn encoder() -> HumanEncoder {
    HumanEncoder::new(EncoderConfig::new())
}

fn context(enc: &HumanEncoder) -> String {
    String::from_utf8(enc.context().to_vec()).expect("utf-8 context")
}

fn text(buf: &Buffer) -> String {
    String::from_utf8(buf.as_bytes().to_vec()).expect("utf-8 record")
}

struct Unserializable;

impl Serialize for Unserializable {
    fn serialize<S: Serializer>(&self, _serializer: S) -> Result<S::Ok, S::Error> {
        Err(S::Error::custom("refused"))
    }
}

// ============================================================================
// Scalars
// ============================================================================

#[test]
fn leader_is_38_spaces_and_a_tab() {
    assert_eq!(INDENT_LEADER.len(), 39);
    assert!(INDENT_LEADER[..38].bytes().all(|b| b == b' '));
    assert!(INDENT_LEADER.ends_with('\t'));
}

#[test]
fn simple_fields_each_take_one_line() {
    let mut enc = encoder();
    enc.add_str("user", "ann");
    enc.add_i64("delta", -3);
    enc.add_u64("count", 7);
    enc.add_usize("slots", 2);
    assert_eq!(
        context(&enc),
        format!("{L}user: ann\n{L}delta: -3\n{L}count: 7\n{L}slots: 2\n")
    );
}

#[test]
fn bool_renders_literal_value_not_type_name() {
    let mut enc = encoder();
    enc.add_bool("ok", true);
    enc.add_bool("retry", false);
    assert_eq!(context(&enc), format!("{L}ok: true\n{L}retry: false\n"));
}

#[test]
fn non_finite_floats_are_quoted() {
    let mut enc = encoder();
    enc.add_f64("nan", f64::NAN);
    enc.add_f64("pos", f64::INFINITY);
    enc.add_f32("neg", f32::NEG_INFINITY);
    assert_eq!(
        context(&enc),
        format!("{L}nan: \"NaN\"\n{L}pos: \"+Inf\"\n{L}neg: \"-Inf\"\n")
    );
}

#[test]
fn finite_floats_use_shortest_text() {
    let mut enc = encoder();
    enc.add_f64("ratio", 1.5);
    enc.add_f32("narrow", 0.1);
    enc.add_f64("whole", 3.0);
    assert_eq!(
        context(&enc),
        format!("{L}ratio: 1.5\n{L}narrow: 0.1\n{L}whole: 3\n")
    );
}

#[test]
fn complex_sign_follows_imaginary_part() {
    let mut enc = encoder();
    enc.add_complex128("a", Complex128::new(1.0, -2.0));
    enc.add_complex128("b", Complex128::new(1.0, 2.5));
    enc.add_complex64("c", Complex64::new(0.5, 0.0));
    enc.add_complex128("d", Complex128::new(f64::NAN, f64::INFINITY));
    assert_eq!(
        context(&enc),
        format!("{L}a: 1-2i\n{L}b: 1+2.5i\n{L}c: 0.5+0i\n{L}d: NaN++Infi\n")
    );
}

#[test]
fn durations_and_times() {
    let mut enc = encoder();
    enc.add_duration("elapsed", Duration::milliseconds(1_500));
    enc.add_time("at", datetime!(2024-01-02 03:04:05.25 UTC));
    assert_eq!(
        context(&enc),
        format!("{L}elapsed: 1.5s\n{L}at: 2024-01-02T03:04:05.25Z\n")
    );
}

// ============================================================================
// Blocks
// ============================================================================

#[test]
fn multi_line_string_becomes_indented_block() {
    let mut enc = encoder();
    enc.add_str("msg", "first  \nsecond\t");
    assert_eq!(
        context(&enc),
        format!("{L}msg: \n{L}  first\n{L}  second\n")
    );
    assert_eq!(enc.open_namespaces(), 0);
}

#[test]
fn trailing_newline_keeps_an_indent_only_line() {
    let mut enc = encoder();
    enc.add_str("msg", "only\n");
    assert_eq!(context(&enc), format!("{L}msg: \n{L}  only\n{L}  \n"));
}

#[test]
fn binary_is_hex_dumped_one_level_deeper() {
    let mut enc = encoder();
    let payload: Vec<u8> = (0u8..20).collect();
    enc.add_binary("blob", &payload);

    let mut first = Buffer::new();
    crate::text::write_hex_dump_line(&mut first, 0, &payload[..16]);
    let mut second = Buffer::new();
    crate::text::write_hex_dump_line(&mut second, 16, &payload[16..]);

    assert_eq!(
        context(&enc),
        format!(
            "{L}blob: \n{L}  {}\n{L}  {}\n{L}  \n",
            text(&first),
            text(&second)
        )
    );
}

#[test]
fn empty_binary_writes_the_label_and_an_indent_only_line() {
    let mut enc = encoder();
    enc.add_byte_string("blob", b"");
    assert_eq!(context(&enc), format!("{L}blob: \n{L}  \n"));
}

#[test]
fn appended_byte_strings_dump_at_the_current_depth() {
    let mut enc = encoder();
    enc.open_namespace("ns");
    let mut dump = Buffer::new();
    crate::text::write_hex_dump_line(&mut dump, 0, b"abcd");

    enc.append_byte_string(b"abcd");
    assert_eq!(
        context(&enc),
        format!("{L}  ns: \n{L}  {}\n{L}  \n", text(&dump))
    );
}

// ============================================================================
// Namespaces
// ============================================================================

#[test]
fn namespace_indents_following_fields() {
    let mut enc = encoder();
    enc.open_namespace("request");
    enc.add_str("id", "7");
    enc.close_namespace();
    enc.add_str("done", "yes");
    assert_eq!(
        context(&enc),
        format!("{L}  request: \n{L}  id: 7\n{L}done: yes\n")
    );
}

#[test]
fn close_namespace_saturates_at_zero() {
    let mut enc = encoder();
    enc.close_namespace();
    assert_eq!(enc.open_namespaces(), 0);
    enc.open_namespace("a");
    enc.open_namespace("b");
    assert_eq!(enc.open_namespaces(), 2);
    enc.close_namespace();
    enc.close_namespace();
    enc.close_namespace();
    assert_eq!(enc.open_namespaces(), 0);
}

// ============================================================================
// Arrays and objects
// ============================================================================

#[test]
fn array_elements_are_comma_separated() {
    let mut enc = encoder();
    let values = ArrayMarshalerFn::new(|enc: &mut dyn ArrayEncoder| {
        enc.append_i64(1);
        enc.append_str("two");
        enc.append_bool(true);
        enc.append_f64(f64::NAN);
        Ok(())
    });
    enc.add_array("xs", &values).expect("array encodes");
    assert_eq!(context(&enc), format!("{L}xs: [ 1, two, true, \"NaN\" ]\n"));
}

#[test]
fn nested_arrays_keep_their_own_separators() {
    let mut enc = encoder();
    let inner = ArrayMarshalerFn::new(|enc: &mut dyn ArrayEncoder| {
        enc.append_u64(2);
        enc.append_u64(3);
        Ok(())
    });
    let outer = ArrayMarshalerFn::new(|enc: &mut dyn ArrayEncoder| {
        enc.append_u64(1);
        enc.append_array(&inner)?;
        enc.append_u64(4);
        Ok(())
    });
    enc.add_array("xs", &outer).expect("array encodes");
    assert_eq!(context(&enc), format!("{L}xs: [ 1, [ 2, 3 ]\n, 4 ]\n"));
}

#[test]
fn empty_array() {
    let mut enc = encoder();
    let empty = ArrayMarshalerFn::new(|_: &mut dyn ArrayEncoder| Ok(()));
    enc.add_array("xs", &empty).expect("array encodes");
    assert_eq!(context(&enc), format!("{L}xs: [  ]\n"));
}

#[test]
fn array_elements_keep_the_enclosing_depth() {
    let mut enc = encoder();
    enc.open_namespace("ns");
    let values = ArrayMarshalerFn::new(|enc: &mut dyn ArrayEncoder| {
        enc.append_str("one\ntwo");
        Ok(())
    });
    enc.add_array("xs", &values).expect("array encodes");

    // Unlike objects, the block lines indent relative to the namespace.
    assert_eq!(
        context(&enc),
        format!("{L}  ns: \n{L}  xs: [ \n{L}    one\n{L}    two ]\n")
    );
    assert_eq!(enc.open_namespaces(), 1);
}

#[test]
fn object_fields_restart_at_depth_zero() {
    let mut enc = encoder();
    enc.open_namespace("ns");
    let obj = ObjectMarshalerFn::new(|enc: &mut dyn ObjectEncoder| {
        enc.add_str("a", "b");
        enc.open_namespace("inner");
        Ok(())
    });
    enc.add_object("obj", &obj).expect("object encodes");
    enc.add_str("after", "c");

    assert_eq!(
        context(&enc),
        format!("{L}  ns: \n{L}  obj: {{{L}a: b\n{L}  inner: \n}}\n\n{L}  after: c\n")
    );
    assert_eq!(enc.open_namespaces(), 1);
}

#[test]
fn objects_inside_arrays_are_separated_like_elements() {
    let mut enc = encoder();
    let obj = ObjectMarshalerFn::new(|enc: &mut dyn ObjectEncoder| {
        enc.add_i64("n", 1);
        Ok(())
    });
    let values = ArrayMarshalerFn::new(|enc: &mut dyn ArrayEncoder| {
        enc.append_object(&obj)?;
        enc.append_object(&obj)?;
        Ok(())
    });
    enc.add_array("objs", &values).expect("array encodes");
    assert_eq!(
        context(&enc),
        format!("{L}objs: [ {{{L}n: 1\n}}\n, {{{L}n: 1\n}}\n ]\n")
    );
}

#[test]
fn failing_array_still_closes_and_restores_state() {
    let mut enc = encoder();
    enc.open_namespace("ns");
    let values = ArrayMarshalerFn::new(|enc: &mut dyn ArrayEncoder| {
        enc.append_i64(1);
        Err(EncodeError::marshal("stopped"))
    });
    let error = enc.add_array("xs", &values).expect_err("marshaler fails");
    assert_eq!(error.to_string(), "marshaling failed: stopped");
    assert_eq!(enc.open_namespaces(), 1);

    enc.append_i64(9);
    assert!(context(&enc).ends_with("xs: [ 1 ]\n9"));
}

#[test]
fn unkeyed_composites_end_their_own_line() {
    let mut enc = encoder();
    let values = ArrayMarshalerFn::new(|enc: &mut dyn ArrayEncoder| {
        enc.append_i64(1);
        enc.append_i64(2);
        Ok(())
    });
    let obj = ObjectMarshalerFn::new(|enc: &mut dyn ObjectEncoder| {
        enc.add_bool("ok", true);
        Ok(())
    });
    enc.append_array(&values).expect("array encodes");
    enc.append_object(&obj).expect("object encodes");
    assert_eq!(context(&enc), format!("[ 1, 2 ]\n{{{L}ok: true\n}}\n"));
}

// ============================================================================
// Reflected values
// ============================================================================

#[test]
fn reflected_values_are_compact_json() {
    let mut enc = encoder();
    let value = serde_json::json!({"a": 1});
    enc.add_reflected("r", Some(&value as &dyn Reflected))
        .expect("json encodes");
    enc.add_reflected("missing", None).expect("nil encodes");
    assert_eq!(context(&enc), format!("{L}r: {{\"a\":1}}\n{L}missing: nil\n"));
}

#[test]
fn reflected_structs_keep_field_order() {
    #[derive(serde::Serialize)]
    struct Req {
        zeta: u8,
        alpha: u8,
    }

    let mut enc = encoder();
    enc.add_reflected("req", Some(&Req { zeta: 1, alpha: 2 } as &dyn Reflected))
        .expect("struct encodes");
    assert_eq!(context(&enc), format!("{L}req: {{\"zeta\":1,\"alpha\":2}}\n"));
}

#[test]
fn failing_reflected_value_writes_nothing() {
    let mut enc = encoder();
    let result = enc.add_reflected("r", Some(&Unserializable as &dyn Reflected));
    assert!(matches!(result, Err(EncodeError::Reflect(_))));
    assert!(enc.context().is_empty());
}

#[test]
fn reflected_array_elements() {
    let mut enc = encoder();
    let values = ArrayMarshalerFn::new(|enc: &mut dyn ArrayEncoder| {
        enc.append_reflected(Some(&vec![1, 2] as &dyn Reflected))?;
        enc.append_reflected(None)?;
        Ok(())
    });
    enc.add_array("xs", &values).expect("array encodes");
    assert_eq!(context(&enc), format!("{L}xs: [ [1,2], nil ]\n"));
}

// ============================================================================
// Cloning and context
// ============================================================================

#[test]
fn clone_copies_context_and_depth() {
    let mut base = encoder();
    base.open_namespace("ns");
    base.add_str("k", "v");

    let mut copy = base.clone();
    assert_eq!(copy.context(), base.context());
    assert_eq!(copy.open_namespaces(), 1);

    copy.add_str("extra", "x");
    assert!(!context(&base).contains("extra"));
}

#[test]
fn with_fields_annotates_failures() {
    let base = encoder();
    let bound = base.with_fields(&[
        Field::reflected("bad", Unserializable),
        Field::int("ok", 1),
    ]);
    let text = context(&bound);
    assert!(text.starts_with(&format!("{L}badError: reflected value could not be serialized")));
    assert!(text.ends_with(&format!("{L}ok: 1\n")));
    assert!(base.context().is_empty());
}

#[test]
fn add_fields_on_a_clone_reports_what_with_fields_swallows() {
    let fields = [Field::reflected("bad", Unserializable), Field::int("ok", 1)];
    let base = encoder();

    let mut observed = base.clone();
    let error = add_fields(&mut observed, &fields).expect("first failure reported");
    assert!(matches!(error, EncodeError::Reflect(_)));
    assert_eq!(observed.context(), base.with_fields(&fields).context());
}

// ============================================================================
// Entries
// ============================================================================

fn sample_entry() -> Entry {
    Entry::new(Level::Info, datetime!(2024-01-02 03:04:05 UTC), "hello")
        .with_logger_name("app")
}

#[test]
fn full_record_layout() {
    let enc = HumanEncoder::new(
        EncoderConfig::new()
            .with_level_encoder(capital_level_encoder())
            .with_function_key("func")
            .with_stacktrace_key("stacktrace"),
    );
    let entry = sample_entry()
        .with_caller(EntryCaller::new("/src/app/main.rs", 42).with_function("app::run"))
        .with_stack("frame one\nframe two");

    let out = enc
        .encode_entry(&entry, &[Field::string("user", "ann")])
        .expect("entry encodes");

    assert_eq!(
        text(&out),
        format!(
            "INFO 2024-01-02T03:04:05Z app\tapp/main.rs:42\tapp::run\thello\n\
             {L}user: ann\n\
             {L}stacktrace: \n{L}  frame one\n{L}  frame two\n\
             \n"
        )
    );
}

#[test]
fn minimal_record_layout() {
    let out = encoder()
        .encode_entry(&sample_entry(), &[])
        .expect("entry encodes");
    assert_eq!(text(&out), "2024-01-02T03:04:05Z app\thello\n\n");
}

#[test]
fn function_and_stack_need_their_keys() {
    let entry = sample_entry()
        .with_caller(EntryCaller::new("main.rs", 3).with_function("main"))
        .with_stack("frame");
    let out = encoder().encode_entry(&entry, &[]).expect("entry encodes");
    assert_eq!(text(&out), "2024-01-02T03:04:05Z app\tmain.rs:3\thello\n\n");
}

#[test]
fn separator_line_is_written_whatever_the_line_ending() {
    let skipped = HumanEncoder::new(EncoderConfig::new().with_skip_line_ending(true));
    let out = skipped.encode_entry(&sample_entry(), &[]).expect("entry encodes");
    assert_eq!(text(&out), "2024-01-02T03:04:05Z app\thello\n\n");

    let out = skipped
        .encode_entry(&sample_entry(), &[Field::int("n", 1)])
        .expect("entry encodes");
    assert!(text(&out).ends_with(&format!("hello\n{L}n: 1\n\n")));
}

#[test]
fn custom_line_ending_follows_the_separator() {
    let crlf = HumanEncoder::new(EncoderConfig::new().with_line_ending("\r\n"));
    let out = crlf.encode_entry(&sample_entry(), &[]).expect("entry encodes");
    assert!(text(&out).ends_with("hello\n\n\r\n"));

    let marker = HumanEncoder::new(EncoderConfig::new().with_line_ending("--\n"));
    let out = marker
        .encode_entry(&sample_entry(), &[Field::int("n", 1)])
        .expect("entry encodes");
    assert!(text(&out).ends_with(&format!("{L}n: 1\n\n--\n")));
}

#[test]
fn context_is_replayed_at_its_depth() {
    let mut base = encoder();
    base.open_namespace("req");
    base.add_str("id", "7");

    let out = base
        .encode_entry(&sample_entry(), &[Field::int("n", 1)])
        .expect("entry encodes");
    assert_eq!(
        text(&out),
        format!("2024-01-02T03:04:05Z app\thello\n{L}  req: \n{L}  id: 7\n{L}  n: 1\n\n")
    );

    assert_eq!(context(&base), format!("{L}  req: \n{L}  id: 7\n"));
    assert_eq!(base.open_namespaces(), 1);
}

#[test]
fn namespace_fields_nest_only_within_their_record() {
    let enc = encoder();
    let out = enc
        .encode_entry(&sample_entry(), &[Field::namespace("ns"), Field::int("a", 1)])
        .expect("entry encodes");
    assert!(text(&out).ends_with(&format!("{L}  ns: \n{L}  a: 1\n\n")));
    assert_eq!(enc.open_namespaces(), 0);

    let out = enc
        .encode_entry(&sample_entry(), &[Field::int("b", 2)])
        .expect("entry encodes");
    assert!(text(&out).ends_with(&format!("hello\n{L}b: 2\n\n")));
}

#[test]
fn failing_field_is_annotated_and_rendering_continues() {
    let bad = ObjectMarshalerFn::new(|enc: &mut dyn ObjectEncoder| {
        enc.add_str("partial", "x");
        Err(EncodeError::marshal("boom"))
    });
    let error = encoder()
        .encode_entry(
            &sample_entry(),
            &[Field::object("bad", bad), Field::int("after", 1)],
        )
        .expect_err("field fails");

    assert_eq!(error.error().to_string(), "marshaling failed: boom");
    assert_eq!(
        text(error.output()),
        format!(
            "2024-01-02T03:04:05Z app\thello\n\
             {L}bad: {{{L}partial: x\n}}\n\n\
             {L}badError: marshaling failed: boom\n\
             {L}after: 1\n\
             \n"
        )
    );
}

#[test]
fn encoder_trait_objects_render_like_the_concrete_type() {
    let enc = encoder().with_fields(&[Field::string("svc", "api")]);
    let boxed: Box<dyn Encoder> = enc.clone_encoder();
    let via_trait = boxed
        .encode_entry(&sample_entry(), &[])
        .expect("entry encodes");
    let direct = enc.encode_entry(&sample_entry(), &[]).expect("entry encodes");
    assert_eq!(via_trait.as_bytes(), direct.as_bytes());
}

#[test]
fn rendered_buffers_come_from_the_global_pool() {
    let out = encoder()
        .encode_entry(&sample_entry(), &[])
        .expect("entry encodes");
    assert!(out.is_pooled());
}
