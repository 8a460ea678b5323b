/*
 * FOCALPLANE Toolkit
 * Copyright (C) 2021-onward Christopher Rabotin <christopher.rabotin@gmail.com> et al. (cf. AUTHORS.md)
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 *
 * Documentation: https://nyxspace.com/
 */

use snafu::prelude::*;

use crate::LocId;

#[derive(Copy, Clone, PartialEq, Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum MathError {
    #[snafu(display("prevented a division by zero when {action}"))]
    DivisionByZero { action: &'static str },
    #[snafu(display("{msg}: {value}"))]
    DomainError { value: f64, msg: &'static str },
    #[snafu(display("max iterations reached ({iter}) when {action}"))]
    MaxIterationsReached { iter: usize, action: &'static str },
}

/// Errors raised by the focal plane model, either at construction or when a
/// caller hands it malformed queries. Per-positioner conditions (unreachable
/// target, collision) are results, not errors, and never appear here.
#[derive(Debug, PartialEq, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum HardwareError {
    #[snafu(display(
        "column {column} has {got} entries but the device table lists {need} locations"
    ))]
    ColumnLength {
        column: &'static str,
        got: usize,
        need: usize,
    },
    #[snafu(display("location {loc} appears more than once in the device table"))]
    DuplicateLocation { loc: LocId },
    #[snafu(display("location {loc} carries unknown state bits {bits:#x}"))]
    UnknownStateBits { loc: LocId, bits: i32 },
    #[snafu(display("location {loc} is not part of this focal plane model"))]
    UnknownLocation { loc: LocId },
    #[snafu(display("{action} requires index-aligned arrays but got lengths {got} and {need}"))]
    BatchShape {
        action: &'static str,
        got: usize,
        need: usize,
    },
    #[snafu(display("could not start the worker pool for {action}: {err}"))]
    WorkerPool { action: &'static str, err: String },
    #[snafu(display("{source} encountered when {action}"))]
    AppliedMath {
        action: &'static str,
        source: MathError,
    },
}

pub type HardwareResult<T> = Result<T, HardwareError>;
