// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Au-Zone Technologies. All Rights Reserved.

//! JNI exports for `com.example.edgevision.native.NativeProcessor`.
//!
//! The Java side owns a processor through an opaque `long` handle returned by
//! `createProcessor` and released with `destroyProcessor`. Every entry point
//! returns `null` (or does nothing) on failure after logging the cause.
#![allow(non_snake_case)]

use crate::{
    bridge::{self, Pipeline},
    error::Error,
    processor::FrameProcessor,
};
use ::jni::{
    objects::{JByteArray, JObject, ReleaseMode},
    sys::{jbyteArray, jdouble, jint, jlong, jstring, JNI_VERSION_1_6},
    JNIEnv, JavaVM,
};
use std::{
    ffi::c_void,
    ptr::null_mut,
    slice::from_raw_parts,
    sync::{Mutex, PoisonError},
};
use tracing::{debug, error};

type Handle = Mutex<FrameProcessor>;

#[no_mangle]
pub extern "system" fn JNI_OnLoad(_vm: JavaVM, _reserved: *mut c_void) -> jint {
    crate::init_tracing(false);
    debug!("{} loaded", bridge::VERSION);
    JNI_VERSION_1_6
}

/// Borrows the processor behind `handle`.
///
/// # Safety
///
/// `handle` must be zero or a value returned by `createProcessor` that has
/// not yet been passed to `destroyProcessor`.
unsafe fn handle_ref<'a>(handle: jlong) -> Option<&'a Handle> {
    (handle as *const Handle).as_ref()
}

fn process(
    env: &mut JNIEnv,
    handle: jlong,
    input: &JByteArray,
    width: jint,
    height: jint,
    pipeline: Pipeline,
) -> jbyteArray {
    let Some(lock) = (unsafe { handle_ref(handle) }) else {
        error!("{} processing called without a processor", pipeline);
        return null_mut();
    };

    let result = {
        let elements = match unsafe { env.get_array_elements(input, ReleaseMode::NoCopyBack) } {
            Ok(elements) => elements,
            Err(e) => {
                error!("Failed to get input bytes: {}", e);
                return null_mut();
            }
        };
        let data = unsafe { from_raw_parts(elements.as_ptr() as *const u8, elements.len()) };

        // A panic while holding the lock is already reported as a processing
        // failure and leaves the buffers in a reusable state.
        let mut processor = lock.lock().unwrap_or_else(PoisonError::into_inner);
        bridge::process_frame(&mut processor, pipeline, data, width, height)
    };

    let Some(bytes) = result else {
        return null_mut();
    };

    match env.byte_array_from_slice(&bytes) {
        Ok(array) => array.into_raw(),
        Err(e) => {
            error!("{}", Error::AllocationFailure(e.to_string()));
            null_mut()
        }
    }
}

#[no_mangle]
pub extern "system" fn Java_com_example_edgevision_native_NativeProcessor_getVersionString<
    'local,
>(
    mut env: JNIEnv<'local>,
    _this: JObject<'local>,
) -> jstring {
    match env.new_string(bridge::version_string()) {
        Ok(version) => version.into_raw(),
        Err(e) => {
            error!("Failed to create version string: {}", e);
            null_mut()
        }
    }
}

#[no_mangle]
pub extern "system" fn Java_com_example_edgevision_native_NativeProcessor_createProcessor<
    'local,
>(
    _env: JNIEnv<'local>,
    _this: JObject<'local>,
) -> jlong {
    let handle = Box::new(Mutex::new(FrameProcessor::new()));
    Box::into_raw(handle) as jlong
}

#[no_mangle]
pub extern "system" fn Java_com_example_edgevision_native_NativeProcessor_destroyProcessor<
    'local,
>(
    _env: JNIEnv<'local>,
    _this: JObject<'local>,
    handle: jlong,
) {
    if handle != 0 {
        drop(unsafe { Box::from_raw(handle as *mut Handle) });
    }
}

#[no_mangle]
pub extern "system" fn Java_com_example_edgevision_native_NativeProcessor_setCannyThresholds<
    'local,
>(
    _env: JNIEnv<'local>,
    _this: JObject<'local>,
    handle: jlong,
    low: jdouble,
    high: jdouble,
) {
    match unsafe { handle_ref(handle) } {
        Some(lock) => lock
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .set_thresholds(low as f32, high as f32),
        None => error!("setCannyThresholds called without a processor"),
    }
}

#[no_mangle]
pub extern "system" fn Java_com_example_edgevision_native_NativeProcessor_processFrameCanny<
    'local,
>(
    mut env: JNIEnv<'local>,
    _this: JObject<'local>,
    handle: jlong,
    input: JByteArray<'local>,
    width: jint,
    height: jint,
) -> jbyteArray {
    process(&mut env, handle, &input, width, height, Pipeline::Canny)
}

#[no_mangle]
pub extern "system" fn Java_com_example_edgevision_native_NativeProcessor_processFrameGrayscale<
    'local,
>(
    mut env: JNIEnv<'local>,
    _this: JObject<'local>,
    handle: jlong,
    input: JByteArray<'local>,
    width: jint,
    height: jint,
) -> jbyteArray {
    process(&mut env, handle, &input, width, height, Pipeline::Grayscale)
}
