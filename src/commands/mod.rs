// Copyright (c) 2025 Florin Authors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

pub mod categories;
pub mod doctor;
pub mod exporter;
pub mod expenses;
pub mod fx;
pub mod goals;
pub mod importer;
pub mod profile;
pub mod reports;
pub mod wallets;
